//! Home Assistant wire-format types
//!
//! This module contains structures that exactly match the JSON schema
//! expected by Home Assistant MQTT integration for discovery.

pub mod discovery;
pub mod mapping;
pub mod topic;

pub use discovery::{HaDeviceInfo, HaSwitchDiscovery};
pub use mapping::{device_to_ha, encode_switch_discovery, switch_to_discovery};
pub use topic::{base_topic, command_topic, config_topic, state_topic};
