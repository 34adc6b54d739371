use core::str::FromStr;

use embassy_net::{DhcpConfig, IpAddress, Runner, Stack, StackResources, dns::DnsQueryType};
use embassy_time::{Duration, Timer};
use esp_hal::peripherals::WIFI;
use esp_hal::rng::Rng;
use esp_radio::wifi::{Config as WifiConfig, WifiController, WifiDevice};
use heapless::String;
use static_cell::make_static;

use crate::config;

const MAX_CONNECTIONS: usize = 4;

pub(crate) fn init_network_stack(
    wifi_device: WIFI<'static>,
) -> (
    Stack<'static>,
    Runner<'static, WifiDevice<'static>>,
    WifiController<'static>,
) {
    let esp_radio_ctrl = &*make_static!(esp_radio::init().expect("Failed to initialize radio"));
    let (controller, interfaces) =
        esp_radio::wifi::new(esp_radio_ctrl, wifi_device, WifiConfig::default())
            .expect("Failed to initialize Wi-Fi");

    let mut dhcp_config = DhcpConfig::default();
    dhcp_config.hostname =
        Some(String::from_str(config::DEVICE_HOSTNAME).expect("Invalid hostname"));
    let net_config = embassy_net::Config::dhcpv4(dhcp_config);

    let network_resources = make_static!(StackResources::<MAX_CONNECTIONS>::new());
    let (stack, runner) =
        embassy_net::new(interfaces.sta, net_config, network_resources, get_seed());

    (stack, runner, controller)
}

fn get_seed() -> u64 {
    let rng = Rng::new();
    u64::from(rng.random()) << 32 | u64::from(rng.random())
}

/// Wait for the link to come up and DHCP to hand out an address
pub(crate) async fn wait_for_connection(stack: Stack<'_>) -> embassy_net::StaticConfigV4 {
    while !stack.is_link_up() {
        Timer::after(Duration::from_millis(100)).await;
    }
    loop {
        if let Some(config) = stack.config_v4() {
            return config;
        }
        Timer::after(Duration::from_millis(100)).await;
    }
}

/// Resolve `host`, which may already be an IPv4 literal
pub(crate) async fn resolve_host(stack: Stack<'_>, host: &str) -> Option<IpAddress> {
    if let Ok(ip) = host.parse::<embassy_net::Ipv4Address>() {
        return Some(IpAddress::Ipv4(ip));
    }

    let addresses = stack.dns_query(host, DnsQueryType::A).await.ok()?;
    addresses.first().copied()
}
