//! Error types for the command path.
//!
//! A rejected command never escapes the interpreter: the error is logged
//! and emitted as an event, and the state machine is left untouched.
//! All variants are `Copy` so they travel through events without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Command parse errors
// ---------------------------------------------------------------------------

/// Why a `blinkrate` line was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// `blinkrate` with nothing after it.
    MissingArgument,
    /// `blinkrate` glued to its argument (e.g. `blinkrate5`).
    MissingSeparator,
    /// Argument contains something other than ASCII digits.
    InvalidNumber,
    /// Argument has more digits than the argument buffer holds.
    ArgumentTooLong,
    /// Argument parsed, but does not fit the persisted `0..=127` range.
    OutOfRange(u16),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument => write!(f, "missing blink rate"),
            Self::MissingSeparator => write!(f, "missing separator after 'blinkrate'"),
            Self::InvalidNumber => write!(f, "blink rate is not a number"),
            Self::ArgumentTooLong => write!(f, "blink rate argument too long"),
            Self::OutOfRange(v) => write!(f, "blink rate {v} out of range 0-127"),
        }
    }
}

/// Command-path `Result` alias.
pub type Result<T> = core::result::Result<T, CommandError>;
