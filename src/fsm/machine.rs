//! Blink state machine bound to its output and store.
//!
//! [`BlinkMachine`] owns the live [`OutputState`] together with the
//! [`OutputPort`] it drives and the [`StoragePort`] that mirrors it.  Every
//! command-driven transition pushes the level to the pin and writes the
//! persisted projection before returning; the periodic [`tick`](BlinkMachine::tick)
//! only drives the pin.

use log::{debug, info, warn};

use super::{BlinkRate, OutputState};
use crate::app::ports::{OutputPort, StoragePort};
use crate::config::SystemConfig;
use crate::persist::PersistedState;

pub struct BlinkMachine<O: OutputPort, S: StoragePort> {
    state: OutputState,
    output: O,
    store: S,
    threshold_ms: u32,
}

impl<O: OutputPort, S: StoragePort> BlinkMachine<O, S> {
    /// Seed the state from `store` and drive the pin to the restored level.
    ///
    /// Missing or invalid keys are defaulted and written back so the store
    /// holds a complete pair from the first boot on.
    pub fn boot(mut output: O, mut store: S, config: &SystemConfig) -> Self {
        let default_rate = BlinkRate::new(config.default_blink_rate).unwrap_or(BlinkRate::DEFAULT);
        let loaded = PersistedState::load(&store, default_rate);
        if !loaded.complete {
            if let Err(e) = loaded.state.save(&mut store) {
                warn!("BlinkMachine: could not seed store: {}", e);
            }
        }

        let state = OutputState::restore(loaded.state.mode, loaded.state.blink_rate);
        output.set_output(state.level);
        info!(
            "BlinkMachine: boot mode={:?} level={} rate={}",
            state.mode, state.level, state.blink_rate
        );

        Self {
            state,
            output,
            store,
            threshold_ms: config.blink_threshold_ms,
        }
    }

    // ── Commands ──────────────────────────────────────────────

    pub fn turn_on(&mut self) {
        self.apply(self.state.switched_on());
    }

    pub fn turn_off(&mut self) {
        self.apply(self.state.switched_off());
    }

    pub fn toggle_level(&mut self) {
        self.apply(self.state.toggled());
    }

    pub fn enter_blink(&mut self) {
        self.apply(self.state.blinking());
    }

    pub fn set_blink_rate(&mut self, rate: BlinkRate) {
        self.apply(self.state.with_rate(rate));
    }

    // ── Timing ────────────────────────────────────────────────

    /// Advance one slice. Returns `true` if the level flipped.
    pub fn tick(&mut self, slice_ms: u32) -> bool {
        let (next, toggled) = self.state.advance(slice_ms, self.threshold_ms);
        self.state = next;
        if toggled {
            debug!("BlinkMachine: blink toggle -> {}", next.level);
            self.output.set_output(next.level);
        }
        toggled
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> OutputState {
        self.state
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Internal ──────────────────────────────────────────────

    /// Commit a command transition: pin first, then the store.
    fn apply(&mut self, next: OutputState) {
        self.state = next;
        self.output.set_output(next.level);
        if let Err(e) = PersistedState::of(&next).save(&mut self.store) {
            warn!("BlinkMachine: persist failed ({}), state kept in RAM", e);
        }
    }
}
