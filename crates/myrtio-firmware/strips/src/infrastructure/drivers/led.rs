use esp_hal::xtensa_lx::interrupt;
use esp_hal::{gpio::interconnect::PeripheralOutput, peripherals::RMT, rmt::Rmt, time::Rate};
use esp_hal_smartled::{SmartLedsAdapter, buffer_size, smart_led_buffer};
use smart_leds::{RGB8, SmartLedsWrite};
use static_cell::make_static;

use myrtio_strips::LedDriver;

use crate::config::STRIP_LEN;

type StripAdapter = SmartLedsAdapter<'static, { buffer_size(STRIP_LEN) }>;

/// WS2812 strip driven by one RMT channel
pub(crate) struct EspStripDriver {
    adapter: StripAdapter,
}

impl EspStripDriver {
    fn new(adapter: StripAdapter) -> Self {
        Self { adapter }
    }
}

impl LedDriver<STRIP_LEN> for EspStripDriver {
    fn write(&mut self, colors: &[RGB8; STRIP_LEN]) {
        // RMT timing breaks if the transfer is preempted
        interrupt::free(|| {
            if let Err(e) = self.adapter.write(colors.iter().copied()) {
                log::warn!("strips: write failed: {:?}", e);
            }
        });
    }
}

/// Bind the four strips to RMT channels 0..=3, in pin order
pub(crate) fn init_strip_drivers<P0, P1, P2, P3>(
    rmt: RMT<'static>,
    pins: (P0, P1, P2, P3),
) -> [EspStripDriver; 4]
where
    P0: PeripheralOutput<'static>,
    P1: PeripheralOutput<'static>,
    P2: PeripheralOutput<'static>,
    P3: PeripheralOutput<'static>,
{
    let rmt = Rmt::new(rmt, Rate::from_mhz(80)).expect("Failed to initialize RMT");
    let (pin0, pin1, pin2, pin3) = pins;

    [
        EspStripDriver::new(SmartLedsAdapter::new(
            rmt.channel0,
            pin0,
            make_static!(smart_led_buffer!(STRIP_LEN)),
        )),
        EspStripDriver::new(SmartLedsAdapter::new(
            rmt.channel1,
            pin1,
            make_static!(smart_led_buffer!(STRIP_LEN)),
        )),
        EspStripDriver::new(SmartLedsAdapter::new(
            rmt.channel2,
            pin2,
            make_static!(smart_led_buffer!(STRIP_LEN)),
        )),
        EspStripDriver::new(SmartLedsAdapter::new(
            rmt.channel3,
            pin3,
            make_static!(smart_led_buffer!(STRIP_LEN)),
        )),
    ]
}
