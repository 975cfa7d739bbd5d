//! Line splitting and normalisation.
//!
//! A chunk returned by one serial read is split on `\r` / `\n`; a chunk
//! without terminators is a single line (the console sends one command per
//! write). Each line is then:
//!
//! 1. trimmed of surrounding ASCII whitespace,
//! 2. truncated to [`LINE_CAPACITY`] bytes (the prefix is kept, the rest
//!    dropped, and [`Line::is_truncated`] is set),
//! 3. lowercased (ASCII only; other bytes pass through).
//!
//! Blank lines are skipped. Lines are copied into a fixed-capacity buffer,
//! never into an unbounded one.

use heapless::Vec;

use crate::config::LINE_CAPACITY;

/// One normalised command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    bytes: Vec<u8, LINE_CAPACITY>,
    truncated: bool,
}

impl Line {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The raw line was longer than [`LINE_CAPACITY`].
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

/// Normalise a single raw line (no terminators expected).
pub fn normalize(raw: &[u8]) -> Line {
    let trimmed = raw.trim_ascii();

    let (kept, truncated) = if trimmed.len() > LINE_CAPACITY {
        (&trimmed[..LINE_CAPACITY], true)
    } else {
        (trimmed, false)
    };

    // `kept` fits by construction.
    let mut bytes: Vec<u8, LINE_CAPACITY> = Vec::from_slice(kept).unwrap_or_default();
    bytes.make_ascii_lowercase();

    Line { bytes, truncated }
}

/// Split a read chunk into normalised, non-blank lines.
pub fn lines(chunk: &[u8]) -> impl Iterator<Item = Line> + '_ {
    chunk
        .split(|b| matches!(b, b'\r' | b'\n'))
        .filter(|raw| !raw.trim_ascii().is_empty())
        .map(normalize)
}
