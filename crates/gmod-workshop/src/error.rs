//! Error types for Workshop operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Workshop operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Workshop operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Request could not be sent or the connection failed
    #[error("Request to {url} failed: {reason}")]
    Network {
        /// Requested URL
        url: String,
        /// Transport error text
        reason: String,
    },

    /// Server answered with a non-success status
    #[error("Request to {url} returned {status}: {reason}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Server-reported reason phrase
        reason: String,
    },

    /// Response body did not have the expected shape
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Item metadata carries no download URL
    #[error("Workshop item {0} has no download URL")]
    NoDownloadUrl(u64),

    /// Compressed bundle could not be decompressed
    #[error("Failed to decompress {}: {reason}", path.display())]
    Decompression {
        /// Bundle that failed
        path: PathBuf,
        /// Decoder error text
        reason: String,
    },

    /// Downloaded package is not a valid archive or could not be extracted
    #[error("Archive error: {0}")]
    Archive(#[from] gmod_gma::Error),

    /// Operation stopped by the caller's cancellation flag
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Create a new Network error
    pub fn network<U: Into<String>, R: ToString>(url: U, reason: R) -> Self {
        Error::Network {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a new InvalidResponse error
    pub fn invalid_response<S: Into<String>>(msg: S) -> Self {
        Error::InvalidResponse(msg.into())
    }

    /// Check if retrying the same request might succeed
    ///
    /// Nothing in this crate retries; callers decide their own policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network { .. } => true,
            Error::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
