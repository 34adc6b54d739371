#![no_std]

//! Controller for several addressable LED strips switched over MQTT
//!
//! Layers:
//! - `pattern` - fixed per-strip color patterns and their store
//! - `state` - enabled flag and per-strip buffers ([`DeviceState`])
//! - `command` / `handler` - `ON`/`OFF` payloads mapped onto the state
//! - `animation` - one-step rotation of every buffer, rendered together
//! - `budget` - frame interval and residual sleep
//! - `supervisor` - connection lifecycle, control loop and safe shutdown
//!
//! Hardware and network sit behind ports: [`LedDriver`], [`Clock`],
//! [`Connector`] and [`MessageChannel`].

pub mod animation;
pub mod budget;
pub mod channel;
pub mod clock;
pub mod command;
pub mod config;
pub mod driver;
pub mod error;
pub mod handler;
pub mod pattern;
pub mod state;
pub mod supervisor;

pub use budget::TimingBudget;
pub use channel::{Connector, InboundMessage, MessageChannel, MqttChannel};
pub use clock::{Clock, EmbassyClock};
pub use command::{Command, Status, Switchable};
pub use config::SupervisorConfig;
pub use driver::LedDriver;
pub use error::Fault;
pub use handler::{Dispatcher, MessageHandler, Outcome};
pub use pattern::{MAX_STRIPS, Pattern, PatternError, PatternStore, StripId};
pub use state::{DeviceState, StateError, Strip};
pub use supervisor::{Discovery, Interrupt, ResetRequest, Supervisor, SupervisorState};

pub use smart_leds::RGB8;
