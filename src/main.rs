//! ledctl firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  UartSerial     HardwareAdapter   NvsAdapter   LogSink   │
//! │  (SerialPort)   (OutputPort)      (Storage+    (Event    │
//! │                                    Config)      Sink)    │
//! │  ─────────────── Port Trait Boundary ─────────────────   │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │  AppService · BlinkMachine (pure logic)            │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │                                                          │
//! │  ControlLoop: read(≤ slice) → interpret → tick → feed    │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;

use ledctl::adapters::hardware::HardwareAdapter;
use ledctl::adapters::log_sink::LogEventSink;
use ledctl::adapters::nvs::NvsAdapter;
use ledctl::adapters::uart::UartSerial;
use ledctl::app::ports::ConfigPort;
use ledctl::app::service::AppService;
use ledctl::config::SystemConfig;
use ledctl::control_loop::ControlLoop;
use ledctl::drivers::led::LedDriver;
use ledctl::drivers::watchdog::Watchdog;
use ledctl::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  ledctl v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. NVS + config ───────────────────────────────────────
    let nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            NvsAdapter::unavailable()
        }
    };
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    };
    info!(
        "Config: slice={}ms threshold={}ms baud={}",
        config.slice_duration_ms, config.blink_threshold_ms, config.uart_baud
    );

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;

    // SAFETY: LED_GPIO is not claimed by any other driver in this firmware.
    let led_pin = PinDriver::output(unsafe { AnyOutputPin::new(pins::LED_GPIO) })?;
    let hw = HardwareAdapter::new(LedDriver::new(led_pin));

    let uart_config = UartConfig::default()
        .baudrate(Hertz(config.uart_baud))
        .rx_fifo_size(pins::UART_DRIVER_BUFFER);
    // SAFETY: UART0 TX/RX are owned by this driver only.
    let uart = UartDriver::new(
        peripherals.uart0,
        unsafe { AnyIOPin::new(pins::UART_TX_GPIO) },
        unsafe { AnyIOPin::new(pins::UART_RX_GPIO) },
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart_config,
    )?;
    let serial = UartSerial::new(uart);

    // ── 4. Application ────────────────────────────────────────
    let mut sink = LogEventSink::new();
    let app = AppService::start(hw, nvs, &config, &mut sink);
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);
    let mut control = ControlLoop::new(serial, app, &config);

    info!("System ready, entering control loop ({}ms slices)", control.slice_ms());

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        control.step(&mut sink);
        watchdog.feed();
    }
}
