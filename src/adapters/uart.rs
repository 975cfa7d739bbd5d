//! UART0 serial adapter (ESP-IDF only).
//!
//! Wraps `esp_idf_hal::uart::UartDriver` behind [`SerialPort`] so the
//! control loop can read command bytes with a bounded wait.

use esp_idf_hal::delay::TickType;
use esp_idf_hal::uart::UartDriver;
use esp_idf_svc::sys::EspError;

use crate::serial::transport::SerialPort;

pub struct UartSerial<'d> {
    driver: UartDriver<'d>,
}

impl<'d> UartSerial<'d> {
    pub fn new(driver: UartDriver<'d>) -> Self {
        Self { driver }
    }
}

impl SerialPort for UartSerial<'_> {
    type Error = EspError;

    fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error> {
        let ticks = TickType::new_millis(u64::from(timeout_ms)).ticks();
        self.driver.read(buf, ticks)
    }
}
