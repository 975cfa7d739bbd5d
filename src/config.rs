//! System configuration parameters
//!
//! Runtime tunables for the LED controller live in [`SystemConfig`]; they
//! can be overridden by a blob in NVS (see [`ConfigPort`](crate::app::ports::ConfigPort)).
//! Buffer capacities are compile-time constants because they size
//! fixed-capacity collections.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Bytes requested from the serial port per slice (`READ_BUF_SIZE - 1` are read).
pub const READ_BUF_SIZE: usize = 2048;

/// Longest command line the interpreter sees. Longer lines are truncated.
pub const LINE_CAPACITY: usize = 49;

/// Longest `blinkrate` argument accepted, in digits.
pub const RATE_ARG_CAPACITY: usize = 4;

/// Highest blink rate representable in the persisted `i8` field.
pub const MAX_BLINK_RATE: u8 = 127;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Timing ---
    /// Duration of one control-loop slice; also the serial read timeout (ms)
    pub slice_duration_ms: u32,
    /// Accumulated `slices * rate * slice_ms` that must be exceeded to toggle (ms)
    pub blink_threshold_ms: u32,

    // --- Defaults ---
    /// Blink rate used when NVS holds no value (toggles per second)
    pub default_blink_rate: u8,

    // --- Peripherals ---
    /// UART0 baud rate
    pub uart_baud: u32,
    /// Task watchdog timeout (ms)
    pub watchdog_timeout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            slice_duration_ms: 100,   // 10 slices per second
            blink_threshold_ms: 1000, // one second

            // Defaults
            default_blink_rate: 1,

            // Peripherals
            uart_baud: 115_200,
            watchdog_timeout_ms: 10_000,
        }
    }
}

impl SystemConfig {
    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(10..=1000).contains(&self.slice_duration_ms) {
            return Err(ConfigError::ValidationFailed(
                "slice_duration_ms must be 10–1000",
            ));
        }
        if !(100..=10_000).contains(&self.blink_threshold_ms) {
            return Err(ConfigError::ValidationFailed(
                "blink_threshold_ms must be 100–10000",
            ));
        }
        if self.default_blink_rate > MAX_BLINK_RATE {
            return Err(ConfigError::ValidationFailed(
                "default_blink_rate must be 0–127",
            ));
        }
        if !(9_600..=921_600).contains(&self.uart_baud) {
            return Err(ConfigError::ValidationFailed(
                "uart_baud must be 9600–921600",
            ));
        }
        if self.watchdog_timeout_ms < self.slice_duration_ms.saturating_mul(10) {
            return Err(ConfigError::ValidationFailed(
                "watchdog_timeout_ms must be at least 10 slices",
            ));
        }
        Ok(())
    }
}
