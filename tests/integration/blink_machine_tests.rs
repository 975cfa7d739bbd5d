//! Integration tests for BlinkMachine → OutputPort / StoragePort.
//!
//! Boot, command transitions and persistence against the mock store,
//! including a simulated reboot on the same store contents.

use crate::mock_hw::{MockOutput, MockStore};

use ledctl::config::SystemConfig;
use ledctl::fsm::machine::BlinkMachine;
use ledctl::fsm::{BlinkRate, Mode};

fn boot(store: &MockStore) -> BlinkMachine<MockOutput, MockStore> {
    BlinkMachine::boot(MockOutput::new(), store.clone(), &SystemConfig::default())
}

fn rate(r: u8) -> BlinkRate {
    BlinkRate::new(r).unwrap()
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn first_boot_seeds_store_with_defaults() {
    let store = MockStore::new();
    let machine = boot(&store);

    let s = machine.state();
    assert_eq!(s.mode, Mode::Off);
    assert!(!s.level);
    assert_eq!(s.blink_rate, BlinkRate::DEFAULT);

    assert_eq!(store.mode_tag(), Some(0));
    assert_eq!(store.rate(), Some(1));
    assert_eq!(store.commits(), 1, "defaults written back in one commit");
    assert_eq!(machine.output().levels, vec![false]);
}

#[test]
fn first_boot_uses_configured_default_rate() {
    let store = MockStore::new();
    let config = SystemConfig {
        default_blink_rate: 9,
        ..Default::default()
    };
    let machine = BlinkMachine::boot(MockOutput::new(), store.clone(), &config);
    assert_eq!(machine.state().blink_rate, rate(9));
    assert_eq!(store.rate(), Some(9));
}

#[test]
fn restart_restores_blink_at_saved_rate() {
    let store = MockStore::with_led_state(2, 3);
    let machine = boot(&store);

    let s = machine.state();
    assert_eq!(s.mode, Mode::Blink);
    assert_eq!(s.blink_rate, rate(3));
    assert!(s.level, "Blink restarts with the output high");
    assert_eq!(s.elapsed_slices, 0);
    assert_eq!(store.commits(), 0, "a complete store is not rewritten");
}

#[test]
fn restart_restores_steady_on() {
    let store = MockStore::with_led_state(1, 40);
    let machine = boot(&store);
    assert_eq!(machine.state().mode, Mode::On);
    assert_eq!(machine.output().last(), Some(true));
}

#[test]
fn invalid_mode_tag_falls_back_and_keeps_rate() {
    let store = MockStore::with_led_state(7, 12);
    let machine = boot(&store);

    assert_eq!(machine.state().mode, Mode::Off);
    assert_eq!(machine.state().blink_rate, rate(12));
    assert_eq!(store.mode_tag(), Some(0), "repaired tag written back");
    assert_eq!(store.rate(), Some(12));
}

#[test]
fn negative_rate_falls_back_to_default() {
    let store = MockStore::with_led_state(1, -5);
    let machine = boot(&store);
    assert_eq!(machine.state().mode, Mode::On);
    assert_eq!(machine.state().blink_rate, BlinkRate::DEFAULT);
    assert_eq!(store.rate(), Some(1));
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn on_off_on_persists_each_step() {
    let store = MockStore::new();
    let mut machine = boot(&store);

    machine.turn_on();
    assert_eq!(store.mode_tag(), Some(1));
    machine.turn_off();
    assert_eq!(store.mode_tag(), Some(0));
    machine.turn_on();
    assert_eq!(store.mode_tag(), Some(1));

    assert_eq!(machine.state().mode, Mode::On);
    assert_eq!(machine.output().levels, vec![false, true, false, true]);
    assert_eq!(store.commits(), 4, "seed + three commands");
}

#[test]
fn set_blink_rate_is_persisted_verbatim() {
    for r in [0u8, 1, 5, 64, 127] {
        let store = MockStore::new();
        let mut machine = boot(&store);
        machine.turn_on();
        machine.set_blink_rate(rate(r));

        assert_eq!(store.rate(), Some(r as i8));
        assert_eq!(machine.state().mode, Mode::On, "rate change keeps the mode");
        assert_eq!(machine.state().blink_rate, rate(r));
    }
}

#[test]
fn enter_blink_flips_immediately_and_persists_blink() {
    let store = MockStore::new();
    let mut machine = boot(&store);

    machine.enter_blink();

    assert_eq!(machine.state().mode, Mode::Blink);
    assert!(machine.state().level);
    assert_eq!(machine.output().last(), Some(true));
    assert_eq!(store.mode_tag(), Some(2));
}

#[test]
fn toggle_in_steady_mode_follows_level() {
    let store = MockStore::new();
    let mut machine = boot(&store);

    machine.toggle_level();
    assert_eq!(machine.state().mode, Mode::On);
    assert_eq!(store.mode_tag(), Some(1));

    machine.toggle_level();
    assert_eq!(machine.state().mode, Mode::Off);
    assert_eq!(store.mode_tag(), Some(0));
}

// ── Timing ────────────────────────────────────────────────────

#[test]
fn default_rate_toggles_on_eleventh_slice() {
    let store = MockStore::new();
    let mut machine = boot(&store);
    machine.enter_blink();

    for n in 1..=10 {
        assert!(!machine.tick(100), "no toggle expected at slice {n}");
    }
    assert!(machine.tick(100));
    assert!(!machine.state().level);
    assert_eq!(machine.output().last(), Some(false));
}

#[test]
fn manual_toggle_keeps_blink_phase() {
    let store = MockStore::new();
    let mut machine = boot(&store);
    machine.set_blink_rate(rate(2));
    machine.enter_blink();
    for _ in 0..3 {
        assert!(!machine.tick(100));
    }

    let before = machine.state().level;
    machine.toggle_level();
    assert_eq!(machine.state().level, !before);
    assert_eq!(machine.state().elapsed_slices, 3);

    let next = (1..=20).find(|_| machine.tick(100));
    assert_eq!(next, Some(3), "automatic toggle stays on the 6-slice cadence");
    assert_eq!(machine.state().level, before);
}

#[test]
fn ticks_never_touch_the_store() {
    let store = MockStore::new();
    let mut machine = boot(&store);
    machine.set_blink_rate(rate(127));
    machine.enter_blink();
    let commits = store.commits();

    let toggles = (0..100).filter(|_| machine.tick(100)).count();

    assert!(toggles > 0);
    assert_eq!(store.commits(), commits);
}

#[test]
fn ticks_in_steady_mode_are_inert() {
    let store = MockStore::new();
    let mut machine = boot(&store);
    machine.turn_on();
    let writes = machine.output().levels.len();

    for _ in 0..50 {
        assert!(!machine.tick(100));
    }
    assert_eq!(machine.output().levels.len(), writes);
}

// ── Persistence failures / reboot ─────────────────────────────

#[test]
fn store_failure_keeps_state_in_ram() {
    let store = MockStore::new();
    store.set_failing(true);
    let mut machine = boot(&store);
    assert_eq!(machine.state().mode, Mode::Off);

    machine.turn_on();
    machine.set_blink_rate(rate(20));

    assert_eq!(machine.state().mode, Mode::On);
    assert_eq!(machine.state().blink_rate, rate(20));
    assert_eq!(machine.output().last(), Some(true));

    store.set_failing(false);
    assert_eq!(store.mode_tag(), None, "nothing reached the store");
    assert_eq!(store.commits(), 0);
}

#[test]
fn reboot_resumes_last_commanded_state() {
    let store = MockStore::new();
    {
        let mut machine = boot(&store);
        machine.set_blink_rate(rate(5));
        machine.enter_blink();
        for _ in 0..7 {
            machine.tick(100);
        }
    }

    let machine = boot(&store);
    assert_eq!(machine.state().mode, Mode::Blink);
    assert_eq!(machine.state().blink_rate, rate(5));
    assert_eq!(machine.state().elapsed_slices, 0);
}
