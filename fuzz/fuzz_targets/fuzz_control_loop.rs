//! Fuzz target: one control-loop slice per input.
//!
//! Whatever bytes arrive, the stored mode/rate pair must stay decodable.
//!
//! cargo fuzz run fuzz_control_loop

#![no_main]

use ledctl::adapters::nvs::NvsAdapter;
use ledctl::app::events::AppEvent;
use ledctl::app::ports::{EventSink, OutputPort, StoragePort};
use ledctl::app::service::AppService;
use ledctl::config::SystemConfig;
use ledctl::control_loop::ControlLoop;
use ledctl::fsm::{BlinkRate, Mode};
use ledctl::persist::{MODE_KEY, NAMESPACE, RATE_KEY};
use ledctl::serial::transport::SerialPort;
use libfuzzer_sys::fuzz_target;

struct Once<'a>(Option<&'a [u8]>);

impl SerialPort for Once<'_> {
    type Error = core::convert::Infallible;

    fn read_timeout(&mut self, buf: &mut [u8], _timeout_ms: u32) -> Result<usize, Self::Error> {
        let Some(data) = self.0.take() else { return Ok(0) };
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Ok(n)
    }
}

struct Pin;

impl OutputPort for Pin {
    fn set_output(&mut self, _level: bool) {}
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(nvs) = NvsAdapter::new() else { return };
    let config = SystemConfig::default();
    let mut sink = Discard;
    let app = AppService::start(Pin, nvs, &config, &mut sink);
    let mut control = ControlLoop::new(Once(Some(data)), app, &config);
    control.step(&mut sink);
    control.step(&mut sink);

    let store = control.app().machine().store();
    let tag = store.read_i8(NAMESPACE, MODE_KEY).ok().flatten();
    let rate = store.read_i8(NAMESPACE, RATE_KEY).ok().flatten();
    assert!(tag.and_then(Mode::from_tag).is_some());
    assert!(rate.map(BlinkRate::try_from).is_some_and(|r| r.is_ok()));
});
