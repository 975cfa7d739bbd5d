//! Hardware adapter — bridges the LED driver to the domain's [`OutputPort`].
//!
//! This is the only module in the system that touches the output pin.

use embedded_hal::digital::OutputPin;

use crate::app::ports::OutputPort;
use crate::drivers::led::LedDriver;

/// Concrete adapter that puts the LED behind the output port.
pub struct HardwareAdapter<P: OutputPin> {
    led: LedDriver<P>,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(led: LedDriver<P>) -> Self {
        Self { led }
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl<P: OutputPin> OutputPort for HardwareAdapter<P> {
    fn set_output(&mut self, level: bool) {
        self.led.set(level);
    }
}
