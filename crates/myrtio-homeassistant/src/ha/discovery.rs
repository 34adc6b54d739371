//! Home Assistant discovery payload structures
//!
//! These types match the exact JSON schema expected by Home Assistant
//! for MQTT discovery messages.

use serde::Serialize;

/// Device information for Home Assistant discovery payload
#[derive(Clone, Serialize)]
pub struct HaDeviceInfo<'a> {
    /// Human-readable device name
    pub name: &'a str,
    /// Device identifiers array
    pub identifiers: &'a [&'a str],
    /// Manufacturer name (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<&'a str>,
    /// Model name (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    /// Software version (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sw_version: Option<&'a str>,
}

/// Switch entity discovery payload for Home Assistant
#[derive(Serialize)]
pub struct HaSwitchDiscovery<'a> {
    /// Human-readable name
    pub name: &'a str,
    /// Unique identifier
    pub unique_id: &'a str,
    /// Topic for commands
    pub command_topic: &'a str,
    /// Topic for state updates
    pub state_topic: &'a str,
    /// Payload that turns the switch on
    pub payload_on: &'a str,
    /// Payload that turns the switch off
    pub payload_off: &'a str,
    /// Device information
    pub device: HaDeviceInfo<'a>,
    /// MDI icon (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'a str>,
}
