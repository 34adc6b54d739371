//! Switch entity domain types
//!
//! A switch is the simplest Home Assistant entity: it accepts two literal
//! payloads on a command topic and reports one of them on a state topic.

use heapless::String;

use crate::{Error, device::Device, ha::topic};

/// Home Assistant component name used in topics
pub const SWITCH_COMPONENT: &str = "switch";

/// Default payload that turns the switch on
pub const PAYLOAD_ON: &str = "ON";

/// Default payload that turns the switch off
pub const PAYLOAD_OFF: &str = "OFF";

/// Switch entity configuration (domain type)
#[derive(Debug, Clone)]
pub struct SwitchEntity<'a> {
    /// Topic namespace placed between the component and the device id
    pub namespace: &'a str,
    /// Human-readable name
    pub name: &'a str,
    /// Reference to parent device
    pub device: &'a Device<'a>,
    /// MDI icon (e.g., "mdi:led-strip")
    pub icon: Option<&'a str>,
    /// Payload that turns the switch on
    pub payload_on: &'a str,
    /// Payload that turns the switch off
    pub payload_off: &'a str,
}

impl<'a> SwitchEntity<'a> {
    /// Create a new switch entity with the default `ON`/`OFF` payloads
    pub const fn new(namespace: &'a str, name: &'a str, device: &'a Device<'a>) -> Self {
        Self {
            namespace,
            name,
            device,
            icon: None,
            payload_on: PAYLOAD_ON,
            payload_off: PAYLOAD_OFF,
        }
    }

    /// Set icon
    #[must_use]
    pub const fn with_icon(mut self, icon: &'a str) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Set on/off payloads
    #[must_use]
    pub const fn with_payloads(mut self, payload_on: &'a str, payload_off: &'a str) -> Self {
        self.payload_on = payload_on;
        self.payload_off = payload_off;
        self
    }
}

/// Pre-computed topics of a switch entity.
///
/// Layout, with `base = switch/{namespace}/{device_id}`:
/// - command: `{base}/set`
/// - state: `{base}/state`
/// - config: `homeassistant/{base}/config`
#[derive(Debug, Clone)]
pub struct SwitchTopics<const N: usize> {
    pub command: String<N>,
    pub state: String<N>,
    pub config: String<N>,
}

impl<const N: usize> SwitchTopics<N> {
    /// Build all topics for an entity
    pub fn new(entity: &SwitchEntity<'_>) -> Result<Self, Error> {
        let base: String<N> =
            topic::base_topic(SWITCH_COMPONENT, entity.namespace, entity.device.id)?;

        Ok(Self {
            command: topic::command_topic(&base)?,
            state: topic::state_topic(&base)?,
            config: topic::config_topic(&base)?,
        })
    }
}
