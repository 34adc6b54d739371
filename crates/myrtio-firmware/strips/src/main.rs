#![no_std]
#![no_main]

#[macro_use]
mod config;
mod infrastructure;

use embassy_executor::Spawner;
use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{clock::CpuClock, efuse::Efuse, timer::timg::TimerGroup};
use myrtio_homeassistant::{Device, MacId, SwitchEntity, SwitchTopics};
use myrtio_strips::supervisor::TOPIC_LEN;
use myrtio_strips::{
    DeviceState, Discovery, Dispatcher, EmbassyClock, Interrupt, Pattern, PatternStore,
    ResetRequest, RGB8, Supervisor, animation,
};

use crate::config::STRIP_LEN;
use crate::infrastructure::broker::TcpConnector;
use crate::infrastructure::drivers::{
    bind_boot_button, init_network_stack, init_strip_drivers, wait_for_connection,
};
use crate::infrastructure::tasks::{network_runner_task, wifi_connection_task};

esp_bootloader_esp_idf::esp_app_desc!();

// static_cell::make_static! in main causes a compiler error
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write(($val));
        x
    }};
}

/// Raised by the BOOT button
static INTERRUPT: Interrupt = Interrupt::new();

fn on_boot_button() {
    INTERRUPT.signal(());
}

fn strip_patterns() -> PatternStore<STRIP_LEN> {
    PatternStore::new()
        .with(0, Pattern::rainbow(0, 255, 96))
        .and_then(|store| {
            store.with(
                1,
                Pattern::dot(0, RGB8::new(255, 80, 0), RGB8::new(6, 2, 0)),
            )
        })
        .and_then(|store| {
            store.with(
                2,
                Pattern::gradient(RGB8::new(0, 0, 160), RGB8::new(0, 160, 40)),
            )
        })
        .and_then(|store| store.with(3, Pattern::rainbow(128, 200, 96)))
        .expect("Invalid strip patterns")
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();

    // Initialize hardware
    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    // Allocate heap memory for the radio (64 + 32 KB)
    esp_alloc::heap_allocator!(
        #[unsafe(link_section = ".dram2_uninit")] size: 64 * 1024
    );
    esp_alloc::heap_allocator!(size: 32 * 1024);

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    log::info!("strips: firmware {}", config::BUILD_VERSION);

    // Blank the strips before anything else can fail
    let patterns: &'static PatternStore<STRIP_LEN> =
        mk_static!(PatternStore<STRIP_LEN>, strip_patterns());
    let drivers = init_strip_drivers(peripherals.RMT, strip_gpios!(peripherals));
    let mut device =
        DeviceState::from_store(patterns, patterns.ids().zip(drivers)).expect("Invalid strips");
    animation::render_all(&mut device);

    bind_boot_button(
        peripherals.IO_MUX,
        boot_button_gpio!(peripherals),
        on_boot_button,
    );

    // Device identity and the switch it announces
    let id: &'static MacId = mk_static!(MacId, Device::id_from_mac(Efuse::mac_address()));
    let ha_device: &'static Device<'static> = mk_static!(
        Device<'static>,
        Device::new(id.as_str(), config::DEVICE_NAME)
            .with_manufacturer(config::DEVICE_MANUFACTURER)
            .with_model(config::DEVICE_MODEL)
            .with_sw_version(config::BUILD_VERSION)
    );
    let entity: &'static SwitchEntity<'static> = mk_static!(
        SwitchEntity<'static>,
        SwitchEntity::new(config::SWITCH_NAMESPACE, config::SWITCH_NAME, ha_device)
    );
    let topics: &'static SwitchTopics<TOPIC_LEN> = mk_static!(
        SwitchTopics<TOPIC_LEN>,
        SwitchTopics::new(entity).expect("Switch topics do not fit")
    );
    log::info!("strips: device {}, commands on {}", id, topics.command);

    // Initialize network stack and spawn network tasks
    let (stack, runner, controller) = init_network_stack(peripherals.WIFI);
    spawner.spawn(wifi_connection_task(controller)).ok();
    spawner.spawn(network_runner_task(runner)).ok();

    let ip = wait_for_connection(stack).await;
    log::info!("network: got address {}", ip.address);

    let mut supervisor = Supervisor::new(
        TcpConnector::new(stack, id.as_str()),
        EmbassyClock,
        Dispatcher::new(topics.command.as_str()),
        device,
        Discovery { entity, topics },
    );
    let ResetRequest = supervisor.run(&INTERRUPT).await;

    log::info!("strips: resetting");
    esp_hal::system::software_reset()
}
