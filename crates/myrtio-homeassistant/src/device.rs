//! The physical device that owns the announced entities

use heapless::String;

/// Length of a device id derived from a 6-byte MAC address
pub const MAC_ID_LEN: usize = 12;

/// Device id as produced by [`Device::id_from_mac`]
pub type MacId = String<MAC_ID_LEN>;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Device metadata shown by Home Assistant.
///
/// `id` is used both in topic names and as the discovery `unique_id`, so it
/// must stay the same across restarts.
#[derive(Debug, Clone)]
pub struct Device<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub manufacturer: Option<&'a str>,
    pub model: Option<&'a str>,
    pub sw_version: Option<&'a str>,
}

impl<'a> Device<'a> {
    pub const fn new(id: &'a str, name: &'a str) -> Self {
        Self {
            id,
            name,
            manufacturer: None,
            model: None,
            sw_version: None,
        }
    }

    /// Stable id from a hardware address: lowercase hex, no separators
    pub fn id_from_mac(mac: [u8; 6]) -> MacId {
        let mut id = MacId::new();
        for byte in mac {
            for nibble in [byte >> 4, byte & 0x0F] {
                // Twelve digits always fit
                let _ = id.push(char::from(HEX_DIGITS[usize::from(nibble)]));
            }
        }
        id
    }

    #[must_use]
    pub const fn with_manufacturer(mut self, manufacturer: &'a str) -> Self {
        self.manufacturer = Some(manufacturer);
        self
    }

    #[must_use]
    pub const fn with_model(mut self, model: &'a str) -> Self {
        self.model = Some(model);
        self
    }

    /// Firmware version reported as `sw_version`
    #[must_use]
    pub const fn with_sw_version(mut self, sw_version: &'a str) -> Self {
        self.sw_version = Some(sw_version);
        self
    }
}
