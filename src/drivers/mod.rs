//! Output driver and peripheral helpers.

pub mod led;
pub mod watchdog;
