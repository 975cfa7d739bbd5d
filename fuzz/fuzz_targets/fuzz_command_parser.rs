//! Fuzz target: line splitting and command parsing.
//!
//! Feeds arbitrary bytes through the codec and the parser. Neither may
//! panic, and every accepted `blinkrate` must be within 0..=127.
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use ledctl::app::commands::Command;
use ledctl::config::{LINE_CAPACITY, MAX_BLINK_RATE};
use ledctl::serial::codec;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for line in codec::lines(data) {
        assert!(line.as_bytes().len() <= LINE_CAPACITY);
        if let Ok(Command::SetBlinkRate(rate)) = Command::parse(line.as_bytes()) {
            assert!(rate.get() <= MAX_BLINK_RATE);
        }
    }
});
