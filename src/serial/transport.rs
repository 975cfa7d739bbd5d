//! Serial input abstraction.
//!
//! The control loop is generic over [`SerialPort`], so the UART driver on
//! the device and scripted byte sources in tests are interchangeable.

/// Byte-oriented input channel with a bounded blocking read.
pub trait SerialPort {
    /// Error type for this port.
    type Error: core::fmt::Debug;

    /// Block for at most `timeout_ms` waiting for bytes, then copy up to
    /// `buf.len()` of them into `buf`.
    ///
    /// `Ok(0)` is the normal "nothing arrived" outcome, not an error.
    fn read_timeout(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error>;
}

/// A port that never delivers bytes and returns immediately.
/// Useful for running the loop without a console attached.
pub struct NullSerial;

impl SerialPort for NullSerial {
    type Error = core::convert::Infallible;

    fn read_timeout(&mut self, _buf: &mut [u8], _timeout_ms: u32) -> Result<usize, Self::Error> {
        Ok(0)
    }
}
