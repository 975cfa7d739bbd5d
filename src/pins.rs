//! GPIO / peripheral pin assignments for the LED controller board.
//!
//! Single source of truth: `main` builds every pin driver from these
//! numbers rather than hard-coding them.

// ---------------------------------------------------------------------------
// Status LED
// ---------------------------------------------------------------------------

/// On-board LED (active HIGH) on the ESP32 DevKit.
pub const LED_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// UART0 (command console, shared with the log output)
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 1;
pub const UART_RX_GPIO: i32 = 3;

/// RX/TX ring-buffer size handed to the UART driver.
pub const UART_DRIVER_BUFFER: usize = 2048;
