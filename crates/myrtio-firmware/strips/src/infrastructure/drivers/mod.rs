mod button;
mod led;
mod network;

pub(crate) use button::bind_boot_button;
pub(crate) use led::{EspStripDriver, init_strip_drivers};
pub(crate) use network::{init_network_stack, resolve_host, wait_for_connection};
