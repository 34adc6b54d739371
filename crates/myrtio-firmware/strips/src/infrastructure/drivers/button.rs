use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use esp_hal::{
    gpio::{Event, Input, InputConfig, InputPin, Io, Pull},
    handler,
    peripherals::IO_MUX,
    ram,
};

/// Called from the GPIO interrupt on every press
pub(crate) type ButtonCallback = fn();

static BUTTON: Mutex<CriticalSectionRawMutex, RefCell<Option<Input>>> =
    Mutex::new(RefCell::new(None));

static CALLBACK: Mutex<CriticalSectionRawMutex, RefCell<Option<ButtonCallback>>> =
    Mutex::new(RefCell::new(None));

/// Listen for presses of the BOOT button
pub(crate) fn bind_boot_button(
    mux: IO_MUX<'static>,
    pin: impl InputPin + 'static,
    on_press: ButtonCallback,
) {
    let mut io = Io::new(mux);
    io.set_interrupt_handler(handle_button_press);

    let mut button = Input::new(pin, InputConfig::default().with_pull(Pull::Up));
    button.listen(Event::FallingEdge);

    BUTTON.lock(|cell| {
        cell.borrow_mut().replace(button);
    });
    CALLBACK.lock(|cell| {
        cell.borrow_mut().replace(on_press);
    });
}

#[handler]
#[ram]
fn handle_button_press() {
    let pressed = BUTTON.lock(|cell| {
        let mut cell = cell.borrow_mut();
        let Some(button) = cell.as_mut() else {
            return false;
        };
        let is_set = button.is_interrupt_set();
        button.clear_interrupt();
        is_set
    });

    if pressed {
        CALLBACK.lock(|cell| {
            if let Some(callback) = cell.borrow().as_ref() {
                callback();
            }
        });
    }
}
