//! GPIO outputs for RP2040

use embassy_rp::gpio::{Level, Output, Pin};
use embassy_rp::Peri;

use envmon_hal::OutputPin;

/// Push-pull output driving a discrete indicator LED
pub struct LedPin<'d> {
    pin: Output<'d>,
}

impl<'d> LedPin<'d> {
    /// Configure a pin as an output, initially low (LED off)
    pub fn new(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            pin: Output::new(pin, Level::Low),
        }
    }
}

impl OutputPin for LedPin<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
