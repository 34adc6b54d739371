//! Home Assistant MQTT integration for embedded devices
//!
//! This crate provides types and utilities for announcing switch-like devices
//! to Home Assistant via MQTT discovery. It is structured in two layers:
//!
//! - **Domain layer** (`device`, `entity`): Platform-independent DTOs for devices and entities
//! - **HA wire layer** (`ha`): JSON-serializable types matching Home Assistant's MQTT schema
//!
//! # Example
//!
//! ```
//! use myrtio_homeassistant::{Device, SwitchEntity, SwitchTopics};
//!
//! const DEVICE: Device = Device::new("a1b2c3", "Strip Controller").with_model("Strips");
//! const SWITCH: SwitchEntity = SwitchEntity::new("myrtio", "Strips", &DEVICE);
//!
//! let topics: SwitchTopics<128> = SwitchTopics::new(&SWITCH).unwrap();
//! assert_eq!(topics.command.as_str(), "switch/myrtio/a1b2c3/set");
//! ```

#![no_std]

pub mod device;
pub mod entity;
pub mod error;
pub mod ha;

// Re-export domain types
pub use device::{Device, MAC_ID_LEN, MacId};
pub use entity::{SwitchEntity, SwitchTopics};
pub use error::Error;

// Re-export HA types for advanced usage
pub use ha::{HaDeviceInfo, HaSwitchDiscovery, encode_switch_discovery};
