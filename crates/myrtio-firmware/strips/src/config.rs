pub(crate) const WIFI_SSID: &str = env!("WIFI_SSID");
pub(crate) const WIFI_PASSWORD: &str = env!("WIFI_PASSWORD");

pub(crate) const MQTT_HOST: &str = env!("MQTT_HOST");
pub(crate) const MQTT_PORT: u16 = 1883;
pub(crate) const MQTT_USERNAME: Option<&str> = option_env!("MQTT_USERNAME");
pub(crate) const MQTT_PASSWORD: Option<&str> = option_env!("MQTT_PASSWORD");
pub(crate) const MQTT_KEEP_ALIVE_SECS: u64 = 15;

pub(crate) const BUILD_VERSION: &str = env!("BUILD_VERSION");

pub(crate) const DEVICE_MANUFACTURER: &str = "MyrtIO";
pub(crate) const DEVICE_NAME: &str = "MyrtIO Strips";
pub(crate) const DEVICE_MODEL: &str = "ESP32 Strips";
pub(crate) const DEVICE_HOSTNAME: &str = "myrtio-strips";
pub(crate) const SWITCH_NAMESPACE: &str = "myrtio";
pub(crate) const SWITCH_NAME: &str = "Strips";

/// Pixels on every strip
pub(crate) const STRIP_LEN: usize = 30;

/// Data pins of the four strips, in strip id order
macro_rules! strip_gpios {
    ($p:expr) => {
        ($p.GPIO25, $p.GPIO26, $p.GPIO27, $p.GPIO14)
    };
}

macro_rules! boot_button_gpio {
    ($p:expr) => {
        $p.GPIO0
    };
}
