//! Cooperative control loop.
//!
//! One [`step`](ControlLoop::step) is one slice:
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────┐
//!  │ read_timeout(buf, slice_ms) ── n == 0 ──┐                │
//!  │        │ n > 0                          │                │
//!  │        ▼                                │                │
//!  │ codec::lines ─▶ AppService::interpret   │                │
//!  │        │                                ▼                │
//!  │        └──────────────────────▶ AppService::tick(slice)  │
//!  └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The read is the only suspension point. A command received in a slice
//! takes effect before that slice's tick.

use log::warn;

use crate::app::ports::{EventSink, OutputPort, StoragePort};
use crate::app::service::AppService;
use crate::config::{LINE_CAPACITY, READ_BUF_SIZE, SystemConfig};
use crate::serial::codec;
use crate::serial::transport::SerialPort;

/// What happened during one slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceReport {
    /// Bytes returned by the serial read.
    pub bytes_read: usize,
    /// Lines handed to the interpreter.
    pub lines: usize,
    /// The blink tick flipped the output.
    pub toggled: bool,
}

pub struct ControlLoop<T: SerialPort, O: OutputPort, S: StoragePort> {
    serial: T,
    app: AppService<O, S>,
    slice_ms: u32,
    /// Heap-allocated; the loop runs on the main task's small stack.
    read_buf: Box<[u8]>,
}

impl<T: SerialPort, O: OutputPort, S: StoragePort> ControlLoop<T, O, S> {
    pub fn new(serial: T, app: AppService<O, S>, config: &SystemConfig) -> Self {
        Self {
            serial,
            app,
            slice_ms: config.slice_duration_ms,
            read_buf: vec![0; READ_BUF_SIZE].into_boxed_slice(),
        }
    }

    /// Run one slice: read, interpret complete lines, tick.
    pub fn step(&mut self, sink: &mut impl EventSink) -> SliceReport {
        let mut report = SliceReport::default();

        let max = READ_BUF_SIZE - 1;
        report.bytes_read = match self.serial.read_timeout(&mut self.read_buf[..max], self.slice_ms) {
            Ok(n) => n.min(max),
            Err(e) => {
                warn!("serial read failed: {:?}", e);
                0
            }
        };

        if report.bytes_read > 0 {
            for line in codec::lines(&self.read_buf[..report.bytes_read]) {
                if line.is_truncated() {
                    warn!(
                        "line longer than {} bytes, processing truncated prefix",
                        LINE_CAPACITY
                    );
                }
                self.app.interpret(line.as_bytes(), sink);
                report.lines += 1;
            }
        }

        report.toggled = self.app.tick(self.slice_ms);
        report
    }

    pub fn app(&self) -> &AppService<O, S> {
        &self.app
    }

    pub fn slice_ms(&self) -> u32 {
        self.slice_ms
    }
}
