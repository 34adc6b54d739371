//! Topic generation utilities for Home Assistant MQTT integration

use core::fmt::Write;
use heapless::String;

use crate::Error;

/// Generate the base topic of an entity
///
/// Format: `{component}/{namespace}/{device_id}`
pub fn base_topic<const N: usize>(
    component: &str,
    namespace: &str,
    device_id: &str,
) -> Result<String<N>, Error> {
    let mut topic = String::new();
    write!(topic, "{}/{}/{}", component, namespace, device_id)
        .map_err(|_| Error::BufferTooSmall)?;
    Ok(topic)
}

/// Generate a command topic for an entity
///
/// Format: `{base}/set`
pub fn command_topic<const N: usize>(base: &str) -> Result<String<N>, Error> {
    suffixed(base, "/set")
}

/// Generate a state topic for an entity
///
/// Format: `{base}/state`
pub fn state_topic<const N: usize>(base: &str) -> Result<String<N>, Error> {
    suffixed(base, "/state")
}

/// Generate a Home Assistant discovery config topic
///
/// Format: `homeassistant/{base}/config`
pub fn config_topic<const N: usize>(base: &str) -> Result<String<N>, Error> {
    let mut topic = String::new();
    write!(topic, "homeassistant/{}/config", base).map_err(|_| Error::BufferTooSmall)?;
    Ok(topic)
}

fn suffixed<const N: usize>(base: &str, suffix: &str) -> Result<String<N>, Error> {
    let mut topic = String::new();
    topic.push_str(base).map_err(|()| Error::BufferTooSmall)?;
    topic.push_str(suffix).map_err(|()| Error::BufferTooSmall)?;
    Ok(topic)
}
