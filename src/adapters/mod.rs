//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to              |
//! |------------|--------------|--------------------------|
//! | `hardware` | OutputPort   | LED GPIO                 |
//! | `log_sink` | EventSink    | Serial log output        |
//! | `nvs`      | StoragePort  | NVS / in-memory store    |
//! |            | ConfigPort   |                          |
//! | `uart`     | SerialPort   | UART0 (ESP-IDF only)     |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
#[cfg(target_os = "espidf")]
pub mod uart;
