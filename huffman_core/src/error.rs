//! Core error type.

use std::fmt;

/// Raised when a tree frame or block frame fails its CRC check, has an
/// invalid length, or the decode walk reaches a node with no child for the
/// bit it just read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptedStream {
    reason: String,
}

impl CorruptedStream {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for CorruptedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for CorruptedStream {}
