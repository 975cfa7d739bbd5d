//! Integration tests for the AppService → BlinkMachine pipeline.
//!
//! Lines go in as the control loop would hand them over (already
//! normalised); the tests check state, store and emitted events.

use crate::mock_hw::{MockOutput, MockStore, VecSink};

use ledctl::app::commands::HELP_TEXT;
use ledctl::app::events::AppEvent;
use ledctl::app::service::AppService;
use ledctl::config::SystemConfig;
use ledctl::error::CommandError;
use ledctl::fsm::{BlinkRate, Mode};

fn make_app(store: &MockStore) -> (AppService<MockOutput, MockStore>, VecSink) {
    let mut sink = VecSink::new();
    let app = AppService::start(
        MockOutput::new(),
        store.clone(),
        &SystemConfig::default(),
        &mut sink,
    );
    (app, sink)
}

#[test]
fn start_emits_started_with_restored_state() {
    let store = MockStore::with_led_state(1, 8);
    let (app, sink) = make_app(&store);

    assert_eq!(sink.events.len(), 1);
    assert_eq!(sink.events[0], AppEvent::Started(app.state()));
    assert_eq!(app.state().mode, Mode::On);
    assert_eq!(app.commands_handled(), 0);
}

#[test]
fn ledon_emits_output_changed() {
    let store = MockStore::new();
    let (mut app, mut sink) = make_app(&store);

    app.interpret(b"ledon", &mut sink);

    assert_eq!(
        sink.last(),
        Some(&AppEvent::OutputChanged {
            mode: Mode::On,
            level: true
        })
    );
    assert_eq!(app.commands_handled(), 1);
}

#[test]
fn ledblink_flips_before_any_tick() {
    let store = MockStore::with_led_state(1, 1);
    let (mut app, mut sink) = make_app(&store);

    app.interpret(b"ledblink", &mut sink);

    let s = app.state();
    assert_eq!(s.mode, Mode::Blink);
    assert!(!s.level, "On → Blink shows one toggle to low");
    assert_eq!(app.machine().output().last(), Some(false));
}

#[test]
fn valid_blinkrate_is_applied_and_persisted() {
    let store = MockStore::new();
    let (mut app, mut sink) = make_app(&store);

    app.interpret(b"blinkrate 42", &mut sink);

    let rate = BlinkRate::new(42).unwrap();
    assert_eq!(app.state().blink_rate, rate);
    assert_eq!(store.rate(), Some(42));
    assert_eq!(sink.last(), Some(&AppEvent::BlinkRateChanged(rate)));
}

#[test]
fn invalid_blinkrate_changes_nothing() {
    let cases: &[(&[u8], CommandError)] = &[
        (b"blinkrate 128", CommandError::OutOfRange(128)),
        (b"blinkrate 9999", CommandError::OutOfRange(9999)),
        (b"blinkrate 12345", CommandError::ArgumentTooLong),
        (b"blinkrate abc", CommandError::InvalidNumber),
        (b"blinkrate -1", CommandError::InvalidNumber),
        (b"blinkrate", CommandError::MissingArgument),
        (b"blinkrate5", CommandError::MissingSeparator),
    ];

    for (line, expected) in cases {
        let store = MockStore::with_led_state(2, 3);
        let (mut app, mut sink) = make_app(&store);
        let before = app.state();
        let commits = store.commits();

        app.interpret(line, &mut sink);

        assert_eq!(app.state(), before, "state changed for {:?}", line.escape_ascii().to_string());
        assert_eq!(store.commits(), commits);
        assert_eq!(store.rate(), Some(3));
        assert_eq!(sink.last(), Some(&AppEvent::CommandRejected(*expected)));
        assert_eq!(app.commands_handled(), 0);
    }
}

#[test]
fn help_lists_commands_without_side_effects() {
    let store = MockStore::new();
    let (mut app, mut sink) = make_app(&store);
    let before = app.state();
    let commits = store.commits();

    app.interpret(b"help", &mut sink);

    assert_eq!(sink.last(), Some(&AppEvent::Help(HELP_TEXT)));
    assert!(HELP_TEXT.iter().any(|l| l.starts_with("blinkrate")));
    assert_eq!(app.state(), before);
    assert_eq!(store.commits(), commits);
    assert_eq!(app.commands_handled(), 0);
}

#[test]
fn unknown_input_is_inert() {
    let store = MockStore::new();
    let (mut app, mut sink) = make_app(&store);
    let before = app.state();
    let levels = app.machine().output().levels.len();

    let lines: [&[u8]; 4] = [b"hello", b"led on", b"ledonn", b"\xff\xfe"];
    for line in lines {
        app.interpret(line, &mut sink);
        assert_eq!(sink.last(), Some(&AppEvent::UnknownCommand));
    }

    assert_eq!(app.state(), before);
    assert_eq!(app.machine().output().levels.len(), levels);
}

#[test]
fn toggle_inside_blink_stays_blinking() {
    let store = MockStore::new();
    let (mut app, mut sink) = make_app(&store);

    app.interpret(b"ledblink", &mut sink);
    app.tick(100);
    app.tick(100);
    let level = app.state().level;
    app.interpret(b"ledtoggle", &mut sink);

    assert_eq!(app.state().mode, Mode::Blink);
    assert_eq!(app.state().level, !level);
    assert_eq!(app.state().elapsed_slices, 2, "manual toggle keeps the phase");
    assert_eq!(store.mode_tag(), Some(2));
}
