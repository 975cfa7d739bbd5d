//! Blink state machine.
//!
//! ```text
//!            ledon                 ledblink
//!   ┌─────┐ ──────▶ ┌────┐ ───────────────────▶ ┌───────┐
//!   │ Off │         │ On │                      │ Blink │ ◀─┐ tick:
//!   └─────┘ ◀────── └────┘ ◀───────────────────  └───────┘ ──┘ flip level
//!            ledoff          ledon / ledoff
//! ```
//!
//! [`OutputState`] is a plain value: every transition and the per-slice
//! [`advance`](OutputState::advance) step are pure functions returning a new
//! state.  [`machine::BlinkMachine`] applies them, drives the output pin and
//! persists the projection through the port traits.

pub mod machine;

use crate::config::MAX_BLINK_RATE;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Output control mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    /// Steady, output low.
    Off = 0,
    /// Steady, output high.
    On = 1,
    /// Output toggled periodically by `tick`.
    Blink = 2,
}

impl Mode {
    /// Tag stored in NVS. For the steady modes it equals the output level.
    pub const fn tag(self) -> i8 {
        self as i8
    }

    /// Decode an NVS tag. Unknown tags yield `None`.
    pub const fn from_tag(tag: i8) -> Option<Self> {
        match tag {
            0 => Some(Self::Off),
            1 => Some(Self::On),
            2 => Some(Self::Blink),
            _ => None,
        }
    }

    /// Steady mode matching an output level.
    pub const fn steady(level: bool) -> Self {
        if level { Self::On } else { Self::Off }
    }
}

// ---------------------------------------------------------------------------
// Blink rate
// ---------------------------------------------------------------------------

/// Toggles per second in [`Mode::Blink`], guaranteed to be `0..=127`.
///
/// Zero is legal: the threshold is never crossed and the output freezes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlinkRate(u8);

impl BlinkRate {
    pub const MAX: Self = Self(MAX_BLINK_RATE);
    /// One toggle per second.
    pub const DEFAULT: Self = Self(1);

    /// `None` if `rate` does not fit the persisted range.
    pub const fn new(rate: u8) -> Option<Self> {
        if rate <= MAX_BLINK_RATE {
            Some(Self(rate))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i8> for BlinkRate {
    type Error = i8;

    /// Negative values (e.g. a corrupted NVS entry) are refused.
    fn try_from(value: i8) -> Result<Self, i8> {
        u8::try_from(value).ok().and_then(Self::new).ok_or(value)
    }
}

impl From<BlinkRate> for i8 {
    fn from(rate: BlinkRate) -> i8 {
        rate.0 as i8
    }
}

impl core::fmt::Display for BlinkRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/s", self.0)
    }
}

// ---------------------------------------------------------------------------
// Output state
// ---------------------------------------------------------------------------

/// Live, in-memory truth of the LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputState {
    pub level: bool,
    pub mode: Mode,
    pub blink_rate: BlinkRate,
    /// Slices counted in Blink since the last toggle or mode change.
    pub elapsed_slices: u32,
}

impl OutputState {
    pub const fn new(mode: Mode, level: bool, blink_rate: BlinkRate) -> Self {
        Self {
            level,
            mode,
            blink_rate,
            elapsed_slices: 0,
        }
    }

    /// Seed the live state from the persisted projection.
    ///
    /// Steady modes restore their level. Blink has no stored phase: it
    /// restarts from zero with the output high, the level the combined tag
    /// has always implied (any non-zero tag drives the pin).
    pub const fn restore(mode: Mode, blink_rate: BlinkRate) -> Self {
        let level = !matches!(mode, Mode::Off);
        Self::new(mode, level, blink_rate)
    }

    /// `ledon`.
    #[must_use]
    pub const fn switched_on(self) -> Self {
        Self::new(Mode::On, true, self.blink_rate)
    }

    /// `ledoff`.
    #[must_use]
    pub const fn switched_off(self) -> Self {
        Self::new(Mode::Off, false, self.blink_rate)
    }

    /// `ledtoggle`: flip the level. Outside Blink the flip is a steady
    /// command, so the mode follows the new level. The blink phase is kept.
    #[must_use]
    pub const fn toggled(self) -> Self {
        let level = !self.level;
        let mode = match self.mode {
            Mode::Blink => Mode::Blink,
            Mode::Off | Mode::On => Mode::steady(level),
        };
        Self { level, mode, ..self }
    }

    /// `ledblink`: one visible toggle, then Blink with a fresh slice count.
    #[must_use]
    pub const fn blinking(self) -> Self {
        let toggled = self.toggled();
        Self::new(Mode::Blink, toggled.level, self.blink_rate)
    }

    /// `blinkrate N`: mode, level and phase are untouched.
    #[must_use]
    pub const fn with_rate(self, blink_rate: BlinkRate) -> Self {
        Self { blink_rate, ..self }
    }

    /// One control-loop slice.
    ///
    /// Outside Blink this is the identity. In Blink the slice counter grows
    /// and, once `elapsed_slices * blink_rate * slice_ms > threshold_ms`
    /// (strict), the level flips and the counter restarts. The returned flag
    /// reports whether the level flipped.
    ///
    /// A toggle therefore fires every `threshold / (rate * slice) + 1`
    /// slices (integer division): 6 slices for rate 2 at 100 ms.
    #[must_use]
    pub fn advance(self, slice_ms: u32, threshold_ms: u32) -> (Self, bool) {
        if self.mode != Mode::Blink {
            return (self, false);
        }

        let elapsed_slices = self.elapsed_slices.saturating_add(1);
        let elapsed_ms = u64::from(elapsed_slices)
            * u64::from(self.blink_rate.get())
            * u64::from(slice_ms);

        if elapsed_ms > u64::from(threshold_ms) {
            let next = Self {
                level: !self.level,
                elapsed_slices: 0,
                ..self
            };
            (next, true)
        } else {
            (
                Self {
                    elapsed_slices,
                    ..self
                },
                false,
            )
        }
    }
}
