//! Serial console input: the port abstraction and line normalisation.

pub mod codec;
pub mod transport;
