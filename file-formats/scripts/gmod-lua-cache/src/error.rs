//! Error types for Lua cache decoding

use std::io;
use thiserror::Error;

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding cache entries
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input is too short to hold the framing and any payload
    #[error("Cache entry too short: {0} bytes")]
    TooShort(usize),

    /// The payload is not a valid compressed stream
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// The payload decompressed to nothing
    #[error("Cache entry decompressed to an empty buffer")]
    Empty,
}

impl Error {
    /// Create a new Decompression error
    pub fn decompression<S: Into<String>>(msg: S) -> Self {
        Error::Decompression(msg.into())
    }

    /// Check if this error concerns a single corrupt entry
    ///
    /// Corrupt entries can be skipped; anything else is an environment
    /// problem that will affect every entry.
    pub fn is_corrupt_entry(&self) -> bool {
        !matches!(self, Error::Io(_))
    }
}
