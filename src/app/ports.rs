//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService / BlinkMachine (domain)
//! ```
//!
//! Driven adapters (LED pin, NVS, event sinks) implement these traits.
//! The domain consumes them via generics, so the core never touches
//! hardware directly. The serial input side lives in
//! [`serial::transport`](crate::serial::transport) because it is consumed
//! by the control loop, not by the domain.

use crate::config::SystemConfig;

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → GPIO)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the single LED output.
///
/// Driver failures are not modelled: implementations log them and move on.
pub trait OutputPort {
    /// Drive the pin to `level` (true = high).
    fn set_output(&mut self, level: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS)
// ───────────────────────────────────────────────────────────────

/// Durable key → small-integer storage.
///
/// Each key is atomic on its own. [`write_i8_all`](Self::write_i8_all)
/// commits a group of keys as one unit where the backend can (a single
/// `nvs_commit` on ESP-IDF), which is how the mode/rate pair is kept
/// consistent.
pub trait StoragePort {
    /// Read a value. `Ok(None)` means the key has never been written.
    fn read_i8(&self, namespace: &str, key: &str) -> Result<Option<i8>, StorageError>;

    /// Write every `(key, value)` pair, then commit once.
    fn write_i8_all(&mut self, namespace: &str, entries: &[(&str, i8)])
    -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists [`SystemConfig`].
///
/// Implementations MUST validate before persisting and reject invalid
/// values with [`ConfigError::ValidationFailed`] rather than clamping them.
pub trait ConfigPort {
    /// Load configuration. Returns [`SystemConfig::default()`] if none is stored.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The backend never initialised (e.g. NVS partition unusable).
    Unavailable,
    /// The backend returned an error code.
    IoError(i32),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::IoError(code) => write!(f, "I/O error (rc={})", code),
        }
    }
}
