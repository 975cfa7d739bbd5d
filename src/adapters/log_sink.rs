//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the logger,
//! which on the device is the ESP-IDF console on UART0 (the same wire the
//! commands arrive on).

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(s) => {
                info!(
                    "START | mode={:?} level={} rate={}",
                    s.mode,
                    if s.level { "HIGH" } else { "LOW" },
                    s.blink_rate
                );
            }
            AppEvent::OutputChanged { mode, level } => {
                info!(
                    "LED | mode={:?} level={}",
                    mode,
                    if *level { "HIGH" } else { "LOW" }
                );
            }
            AppEvent::BlinkRateChanged(rate) => {
                info!("RATE | blink rate set to {}", rate);
            }
            AppEvent::Help(lines) => {
                for line in lines.iter() {
                    info!("HELP | {}", line);
                }
            }
            AppEvent::UnknownCommand => {
                debug!("CMD | unrecognised, ignored");
            }
            AppEvent::CommandRejected(e) => {
                debug!("CMD | rejected: {}", e);
            }
        }
    }
}
