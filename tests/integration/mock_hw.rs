//! Mock adapters for integration tests.
//!
//! Records every output write and store commit so tests can assert on the
//! full history without touching real GPIO or flash.

use ledctl::app::events::AppEvent;
use ledctl::app::ports::{EventSink, OutputPort, StorageError, StoragePort};
use ledctl::persist::{MODE_KEY, NAMESPACE, RATE_KEY};
use ledctl::serial::transport::SerialPort;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

// ── MockOutput ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockOutput {
    pub levels: Vec<bool>,
}

#[allow(dead_code)]
impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<bool> {
        self.levels.last().copied()
    }
}

impl OutputPort for MockOutput {
    fn set_output(&mut self, level: bool) {
        self.levels.push(level);
    }
}

// ── MockStore ─────────────────────────────────────────────────
//
// Shared behind an `Rc` so a test can keep a handle after the machine
// takes ownership, then "reboot" against the same contents.

#[derive(Default)]
pub struct StoreState {
    pub map: HashMap<(String, String), i8>,
    pub commits: usize,
    pub failing: bool,
}

#[derive(Clone, Default)]
pub struct MockStore {
    inner: Rc<RefCell<StoreState>>,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a mode tag and a blink rate.
    pub fn with_led_state(tag: i8, rate: i8) -> Self {
        let store = Self::new();
        store.put(MODE_KEY, tag);
        store.put(RATE_KEY, rate);
        store
    }

    pub fn put(&self, key: &str, value: i8) {
        self.inner
            .borrow_mut()
            .map
            .insert((NAMESPACE.to_string(), key.to_string()), value);
    }

    pub fn get(&self, key: &str) -> Option<i8> {
        self.inner
            .borrow()
            .map
            .get(&(NAMESPACE.to_string(), key.to_string()))
            .copied()
    }

    pub fn mode_tag(&self) -> Option<i8> {
        self.get(MODE_KEY)
    }

    pub fn rate(&self) -> Option<i8> {
        self.get(RATE_KEY)
    }

    pub fn commits(&self) -> usize {
        self.inner.borrow().commits
    }

    pub fn set_failing(&self, failing: bool) {
        self.inner.borrow_mut().failing = failing;
    }
}

impl StoragePort for MockStore {
    fn read_i8(&self, namespace: &str, key: &str) -> Result<Option<i8>, StorageError> {
        let inner = self.inner.borrow();
        if inner.failing {
            return Err(StorageError::IoError(-1));
        }
        Ok(inner
            .map
            .get(&(namespace.to_string(), key.to_string()))
            .copied())
    }

    fn write_i8_all(&mut self, namespace: &str, entries: &[(&str, i8)]) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if inner.failing {
            return Err(StorageError::IoError(-1));
        }
        for (key, value) in entries {
            inner
                .map
                .insert((namespace.to_string(), (*key).to_string()), *value);
        }
        inner.commits += 1;
        Ok(())
    }
}

// ── VecSink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct VecSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&AppEvent> {
        self.events.last()
    }
}

impl EventSink for VecSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── ScriptedSerial ────────────────────────────────────────────

/// Plays back one queued chunk per read; an empty queue reads as timeout.
/// `None` entries simulate a driver error.
#[derive(Default)]
pub struct ScriptedSerial {
    chunks: VecDeque<Option<Vec<u8>>>,
    pub reads: usize,
}

#[allow(dead_code)]
impl ScriptedSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.chunks.push_back(Some(chunk.to_vec()));
    }

    pub fn push_error(&mut self) {
        self.chunks.push_back(None);
    }
}

#[derive(Debug)]
pub struct ReadFailed;

impl SerialPort for ScriptedSerial {
    type Error = ReadFailed;

    fn read_timeout(&mut self, buf: &mut [u8], _timeout_ms: u32) -> Result<usize, Self::Error> {
        self.reads += 1;
        match self.chunks.pop_front() {
            None => Ok(0),
            Some(None) => Err(ReadFailed),
            Some(Some(chunk)) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                Ok(n)
            }
        }
    }
}
