//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  On the device the only
//! sink is the serial log; tests collect them in a `Vec`.

use crate::error::CommandError;
use crate::fsm::{BlinkRate, Mode, OutputState};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The service booted from persisted state.
    Started(OutputState),

    /// A command changed the mode and/or the output level.
    OutputChanged { mode: Mode, level: bool },

    /// `blinkrate N` was accepted.
    BlinkRateChanged(BlinkRate),

    /// `help` was received; carries the usage listing.
    Help(&'static [&'static str]),

    /// The line matched no command.
    UnknownCommand,

    /// A `blinkrate` line was refused.
    CommandRejected(CommandError),
}
