//! On/off commands and the status they produce

use heapless::Vec;

use crate::animation;
use crate::driver::LedDriver;
use crate::state::DeviceState;

/// Payload that turns the strips on
pub const PAYLOAD_ON: &[u8] = b"ON";

/// Payload that turns the strips off
pub const PAYLOAD_OFF: &[u8] = b"OFF";

/// Longest raw payload kept for an unrecognized command
pub const MAX_PAYLOAD_LEN: usize = 64;

/// A parsed command payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    TurnOn,
    TurnOff,
    /// Anything else, truncated to [`MAX_PAYLOAD_LEN`] bytes
    Unrecognized(Vec<u8, MAX_PAYLOAD_LEN>),
}

/// Reported on/off status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    On,
    Off,
}

impl Status {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled { Status::On } else { Status::Off }
    }

    pub fn payload(self) -> &'static [u8] {
        match self {
            Status::On => PAYLOAD_ON,
            Status::Off => PAYLOAD_OFF,
        }
    }
}

/// Something that can be switched on and off
pub trait Switchable {
    fn switch_on(&mut self);

    fn switch_off(&mut self);

    fn is_on(&self) -> bool;
}

impl<D: LedDriver<N>, const N: usize> Switchable for DeviceState<'_, D, N> {
    /// Enable, reset every buffer to its pattern and show it
    fn switch_on(&mut self) {
        self.enable();
        animation::render_all(self);
    }

    /// Disable and blank every strip
    fn switch_off(&mut self) {
        self.disable();
        animation::render_all(self);
    }

    fn is_on(&self) -> bool {
        self.is_enabled()
    }
}

/// Map a payload to a command. Matching is exact and case-sensitive.
pub fn dispatch(payload: &[u8]) -> Command {
    match payload {
        PAYLOAD_ON => Command::TurnOn,
        PAYLOAD_OFF => Command::TurnOff,
        other => {
            let kept = &other[..other.len().min(MAX_PAYLOAD_LEN)];
            Command::Unrecognized(Vec::from_slice(kept).unwrap_or_default())
        }
    }
}

/// Apply a command, returning the status to publish.
///
/// `TurnOn` always resets the buffers, also when already on.
pub fn apply<S: Switchable + ?Sized>(command: &Command, target: &mut S) -> Option<Status> {
    match command {
        Command::TurnOn => {
            target.switch_on();
            Some(Status::On)
        }
        Command::TurnOff => {
            target.switch_off();
            Some(Status::Off)
        }
        Command::Unrecognized(_) => None,
    }
}
