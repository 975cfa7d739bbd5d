//! Single-LED output driver.
//!
//! Generic over [`embedded_hal::digital::OutputPin`]: on ESP-IDF this is an
//! `esp_idf_svc::hal::gpio::PinDriver` in output mode, in host tests any
//! mock pin. Pin errors are logged, never propagated.

use embedded_hal::digital::OutputPin;
use log::warn;

pub struct LedDriver<P: OutputPin> {
    pin: P,
}

impl<P: OutputPin> LedDriver<P> {
    /// Wrap a configured output pin. The pin is not written until the
    /// first [`set`](Self::set).
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn set(&mut self, level: bool) {
        let result = if level {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if let Err(e) = result {
            warn!("LED: pin write failed: {:?}", e);
        }
    }
}
