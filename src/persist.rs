//! Persisted projection of the LED state.
//!
//! Two `i8` keys in the `led_state` NVS namespace:
//!
//! | Key          | Value                                   |
//! |--------------|-----------------------------------------|
//! | `led_state`  | mode tag: 0 = Off, 1 = On, 2 = Blink    |
//! | `blink_rate` | toggles per second, 0–127               |
//!
//! Both keys are always written together through
//! [`StoragePort::write_i8_all`]. Values that fail to decode on load (a torn
//! or foreign write) fall back to their defaults individually.

use log::{info, warn};

use crate::app::ports::{StorageError, StoragePort};
use crate::fsm::{BlinkRate, Mode, OutputState};

pub const NAMESPACE: &str = "led_state";
pub const MODE_KEY: &str = "led_state";
pub const RATE_KEY: &str = "blink_rate";

/// Durable mirror of [`OutputState`]'s mode and blink rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedState {
    pub mode: Mode,
    pub blink_rate: BlinkRate,
}

/// Result of reading the store at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loaded {
    pub state: PersistedState,
    /// Both keys were present and valid; when false the caller should
    /// write the (partially) defaulted state back.
    pub complete: bool,
}

impl PersistedState {
    /// First-boot defaults: Off at `default_rate`.
    pub const fn defaults(default_rate: BlinkRate) -> Self {
        Self {
            mode: Mode::Off,
            blink_rate: default_rate,
        }
    }

    /// Project the live state.
    pub const fn of(state: &OutputState) -> Self {
        Self {
            mode: state.mode,
            blink_rate: state.blink_rate,
        }
    }

    /// Read both keys. A store that cannot be read yields the defaults.
    pub fn load(store: &impl StoragePort, default_rate: BlinkRate) -> Loaded {
        let defaults = Self::defaults(default_rate);

        let tag = match store.read_i8(NAMESPACE, MODE_KEY) {
            Ok(v) => v,
            Err(e) => {
                warn!("persist: mode read failed ({}), using defaults", e);
                return Loaded {
                    state: defaults,
                    complete: false,
                };
            }
        };
        let rate = match store.read_i8(NAMESPACE, RATE_KEY) {
            Ok(v) => v,
            Err(e) => {
                warn!("persist: rate read failed ({}), using defaults", e);
                return Loaded {
                    state: defaults,
                    complete: false,
                };
            }
        };

        let mode = tag.and_then(|t| {
            let mode = Mode::from_tag(t);
            if mode.is_none() {
                warn!("persist: invalid mode tag {}, defaulting to Off", t);
            }
            mode
        });
        let blink_rate = rate.and_then(|r| match BlinkRate::try_from(r) {
            Ok(rate) => Some(rate),
            Err(bad) => {
                warn!("persist: invalid blink rate {}, defaulting to {}", bad, default_rate);
                None
            }
        });

        let complete = mode.is_some() && blink_rate.is_some();
        let state = Self {
            mode: mode.unwrap_or(defaults.mode),
            blink_rate: blink_rate.unwrap_or(defaults.blink_rate),
        };
        if complete {
            info!("persist: loaded mode={:?} rate={}", state.mode, state.blink_rate);
        } else {
            info!("persist: no complete saved state, seeded {:?}", state);
        }
        Loaded { state, complete }
    }

    /// Write both keys as one commit.
    pub fn save(&self, store: &mut impl StoragePort) -> Result<(), StorageError> {
        store.write_i8_all(
            NAMESPACE,
            &[
                (MODE_KEY, self.mode.tag()),
                (RATE_KEY, i8::from(self.blink_rate)),
            ],
        )
    }
}
