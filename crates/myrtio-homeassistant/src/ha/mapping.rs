//! Mapping between domain types and Home Assistant wire types

use crate::Error;
use crate::device::Device;
use crate::entity::switch::{SwitchEntity, SwitchTopics};
use crate::ha::discovery::{HaDeviceInfo, HaSwitchDiscovery};

/// Convert a domain Device to [`HaDeviceInfo`]
pub fn device_to_ha<'a>(device: &'a Device<'a>, identifiers: &'a [&'a str]) -> HaDeviceInfo<'a> {
    HaDeviceInfo {
        name: device.name,
        identifiers,
        manufacturer: device.manufacturer,
        model: device.model,
        sw_version: device.sw_version,
    }
}

/// Build [`HaSwitchDiscovery`] from a [`SwitchEntity`] and its topics
///
/// The device id doubles as the entity `unique_id`.
pub fn switch_to_discovery<'a, const N: usize>(
    entity: &'a SwitchEntity<'a>,
    topics: &'a SwitchTopics<N>,
    identifiers: &'a [&'a str],
) -> HaSwitchDiscovery<'a> {
    HaSwitchDiscovery {
        name: entity.name,
        unique_id: entity.device.id,
        command_topic: topics.command.as_str(),
        state_topic: topics.state.as_str(),
        payload_on: entity.payload_on,
        payload_off: entity.payload_off,
        device: device_to_ha(entity.device, identifiers),
        icon: entity.icon,
    }
}

/// Serialize the discovery payload of a switch into `buf`.
///
/// Returns the number of bytes written.
pub fn encode_switch_discovery<const N: usize>(
    entity: &SwitchEntity<'_>,
    topics: &SwitchTopics<N>,
    buf: &mut [u8],
) -> Result<usize, Error> {
    let identifiers = [entity.device.id];
    let config = switch_to_discovery(entity, topics, &identifiers);
    serde_json_core::to_slice(&config, buf).map_err(|_| Error::Serialization)
}
