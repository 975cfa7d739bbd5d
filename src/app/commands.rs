//! Inbound commands and their line grammar.
//!
//! The grammar is deliberately narrow: five bare keywords plus
//! `blinkrate <N>`. Lines reach the parser already trimmed and lowercased
//! by the control loop (see [`serial::codec`](crate::serial::codec)).
//!
//! ```text
//! help | ledon | ledoff | ledtoggle | ledblink
//! blinkrate <ws> <1-4 digits, value 0-127>
//! ```

use crate::config::RATE_ARG_CAPACITY;
use crate::error::{CommandError, Result};
use crate::fsm::BlinkRate;

const BLINK_RATE_PREFIX: &[u8] = b"blinkrate";

/// Usage listing emitted for `help`.
pub const HELP_TEXT: &[&str] = &[
    "Commands:",
    "ledon",
    "ledoff",
    "ledtoggle",
    "ledblink",
    "blinkrate <0-127>",
];

/// Commands the serial console can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print the usage listing.
    Help,
    /// Steady on.
    LedOn,
    /// Steady off.
    LedOff,
    /// Flip the output level.
    LedToggle,
    /// Enter periodic blinking.
    LedBlink,
    /// Change the blink rate (toggles per second).
    SetBlinkRate(BlinkRate),
    /// Anything else; inert.
    Unknown,
}

impl Command {
    /// Parse one normalised line.
    ///
    /// Unrecognised text is `Ok(Command::Unknown)`. An `Err` is only
    /// returned for lines that start with `blinkrate` but carry a bad
    /// argument, so the caller can say why the line was ignored.
    pub fn parse(line: &[u8]) -> Result<Self> {
        match line {
            b"help" => Ok(Self::Help),
            b"ledon" => Ok(Self::LedOn),
            b"ledoff" => Ok(Self::LedOff),
            b"ledtoggle" => Ok(Self::LedToggle),
            b"ledblink" => Ok(Self::LedBlink),
            _ => match line.strip_prefix(BLINK_RATE_PREFIX) {
                Some(rest) => parse_blink_rate(rest).map(Self::SetBlinkRate),
                None => Ok(Self::Unknown),
            },
        }
    }
}

/// Parse what follows `blinkrate`: one whitespace separator, then digits.
fn parse_blink_rate(rest: &[u8]) -> Result<BlinkRate> {
    let Some((&separator, arg)) = rest.split_first() else {
        return Err(CommandError::MissingArgument);
    };
    if !separator.is_ascii_whitespace() {
        return Err(CommandError::MissingSeparator);
    }

    let arg = arg.trim_ascii();
    if arg.is_empty() {
        return Err(CommandError::MissingArgument);
    }
    if !arg.iter().all(u8::is_ascii_digit) {
        return Err(CommandError::InvalidNumber);
    }
    if arg.len() > RATE_ARG_CAPACITY {
        return Err(CommandError::ArgumentTooLong);
    }

    // At most four digits, so the value fits a u16.
    let value = arg
        .iter()
        .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));

    u8::try_from(value)
        .ok()
        .and_then(BlinkRate::new)
        .ok_or(CommandError::OutOfRange(value))
}
