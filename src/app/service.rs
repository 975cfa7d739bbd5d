//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the [`BlinkMachine`] and turns normalised command
//! lines into state-machine operations.  All I/O flows through port
//! traits, making the service testable with mock adapters.
//!
//! ```text
//!  line ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!           │        AppService        │
//!           │  Command::parse · match  │
//!           └────────────┬─────────────┘
//!                        ▼
//!                  BlinkMachine ──▶ OutputPort
//!                        └────────▶ StoragePort
//! ```

use log::{debug, info};

use crate::config::SystemConfig;
use crate::fsm::machine::BlinkMachine;
use crate::fsm::OutputState;

use super::commands::{Command, HELP_TEXT};
use super::events::AppEvent;
use super::ports::{EventSink, OutputPort, StoragePort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service interprets commands and drives the machine.
pub struct AppService<O: OutputPort, S: StoragePort> {
    machine: BlinkMachine<O, S>,
    commands_handled: u32,
}

impl<O: OutputPort, S: StoragePort> AppService<O, S> {
    /// Seed the machine from the store and announce the initial state.
    pub fn start(output: O, store: S, config: &SystemConfig, sink: &mut impl EventSink) -> Self {
        let machine = BlinkMachine::boot(output, store, config);
        sink.emit(&AppEvent::Started(machine.state()));
        info!("AppService started in {:?}", machine.state().mode);
        Self {
            machine,
            commands_handled: 0,
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Interpret one normalised line. Malformed input is logged and ignored.
    pub fn interpret(&mut self, line: &[u8], sink: &mut impl EventSink) {
        info!("data: {}", line.escape_ascii());
        match Command::parse(line) {
            Ok(cmd) => self.handle_command(cmd, sink),
            Err(e) => {
                debug!("ignoring '{}': {}", line.escape_ascii(), e);
                sink.emit(&AppEvent::CommandRejected(e));
            }
        }
    }

    /// Dispatch a parsed command.
    pub fn handle_command(&mut self, cmd: Command, sink: &mut impl EventSink) {
        match cmd {
            Command::Help => {
                sink.emit(&AppEvent::Help(HELP_TEXT));
                return;
            }
            Command::Unknown => {
                sink.emit(&AppEvent::UnknownCommand);
                return;
            }
            Command::LedOn => self.machine.turn_on(),
            Command::LedOff => self.machine.turn_off(),
            Command::LedToggle => self.machine.toggle_level(),
            Command::LedBlink => self.machine.enter_blink(),
            Command::SetBlinkRate(rate) => {
                self.machine.set_blink_rate(rate);
                self.commands_handled = self.commands_handled.wrapping_add(1);
                sink.emit(&AppEvent::BlinkRateChanged(rate));
                return;
            }
        }

        self.commands_handled = self.commands_handled.wrapping_add(1);
        let state = self.machine.state();
        sink.emit(&AppEvent::OutputChanged {
            mode: state.mode,
            level: state.level,
        });
    }

    // ── Per-slice orchestration ───────────────────────────────

    /// Advance the blink schedule by one slice.
    pub fn tick(&mut self, slice_ms: u32) -> bool {
        self.machine.tick(slice_ms)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> OutputState {
        self.machine.state()
    }

    /// State-changing commands applied since boot (wraps).
    pub fn commands_handled(&self) -> u32 {
        self.commands_handled
    }

    pub fn machine(&self) -> &BlinkMachine<O, S> {
        &self.machine
    }
}
