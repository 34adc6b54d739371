fn main() {
    // WIFI_SSID, WIFI_PASSWORD, MQTT_HOST and the optional MQTT credentials
    // may come from a `.env` file next to this manifest.
    dotenv_build::output(dotenv_build::Config::default()).ok();

    let version = chrono::Utc::now().format("%Y%m%d%H%M");
    println!("cargo:rustc-env=BUILD_VERSION={version}");
    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}
