//! Error types for the Home Assistant MQTT library

use core::fmt;

/// Error type for Home Assistant operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// JSON serialization error
    Serialization,
    /// Topic or identifier did not fit its buffer
    BufferTooSmall,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Serialization => write!(f, "JSON serialization error"),
            Error::BufferTooSmall => write!(f, "Buffer too small"),
        }
    }
}
