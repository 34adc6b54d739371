//! Routing of inbound messages to commands

use crate::command::{self, Status, Switchable};

/// Result of handling one inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State changed; the status must be published
    Changed(Status),
    /// Command topic, but the payload is not a known command
    Unrecognized,
    /// Message on a topic this handler does not own
    ForeignTopic,
}

/// Capability to react to inbound messages
pub trait MessageHandler {
    fn handle<S: Switchable + ?Sized>(&mut self, topic: &str, payload: &[u8], target: &mut S)
    -> Outcome;
}

/// Handles `ON`/`OFF` payloads on a single command topic
#[derive(Debug, Clone)]
pub struct Dispatcher<'t> {
    command_topic: &'t str,
}

impl<'t> Dispatcher<'t> {
    pub const fn new(command_topic: &'t str) -> Self {
        Self { command_topic }
    }

    pub fn command_topic(&self) -> &'t str {
        self.command_topic
    }
}

impl MessageHandler for Dispatcher<'_> {
    fn handle<S: Switchable + ?Sized>(
        &mut self,
        topic: &str,
        payload: &[u8],
        target: &mut S,
    ) -> Outcome {
        if topic != self.command_topic {
            return Outcome::ForeignTopic;
        }
        let command = command::dispatch(payload);
        match command::apply(&command, target) {
            Some(status) => {
                log::debug!("strips: switched {:?}", status);
                Outcome::Changed(status)
            }
            None => Outcome::Unrecognized,
        }
    }
}
