use embassy_net::Runner;
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{
    AuthMethod, ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent, WifiStaState,
};

use crate::config;

/// Keep the station associated, reconnecting whenever the link drops
#[embassy_executor::task]
pub(crate) async fn wifi_connection_task(mut controller: WifiController<'static>) {
    loop {
        if esp_radio::wifi::sta_state() == WifiStaState::Connected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            log::warn!("network: disconnected");
            Timer::after(Duration::from_millis(2000)).await;
        }

        if !matches!(controller.is_started(), Ok(true)) {
            let client_config = if config::WIFI_PASSWORD.is_empty() {
                ClientConfig::default()
                    .with_ssid(config::WIFI_SSID.into())
                    .with_auth_method(AuthMethod::None)
            } else {
                ClientConfig::default()
                    .with_ssid(config::WIFI_SSID.into())
                    .with_password(config::WIFI_PASSWORD.into())
            };
            if let Err(e) = controller.set_config(&ModeConfig::Client(client_config)) {
                log::error!("network: invalid config: {:?}", e);
            }
            if let Err(e) = controller.start_async().await {
                log::error!("network: failed to start: {:?}", e);
                Timer::after(Duration::from_millis(5000)).await;
                continue;
            }
        }

        log::info!("network: connecting to {}", config::WIFI_SSID);
        if let Err(e) = controller.connect_async().await {
            log::warn!("network: error connecting: {:?}", e);
            Timer::after(Duration::from_millis(5000)).await;
        }
    }
}

#[embassy_executor::task]
pub(crate) async fn network_runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}
