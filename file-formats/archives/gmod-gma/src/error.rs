//! Error types for the GMA library

use std::io;
use thiserror::Error;

/// Result type alias for GMA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for GMA operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file does not start with the `GMAD` marker
    #[error("Not a GMA archive: bad magic {found:02X?}")]
    BadMagic {
        /// The four bytes found at offset 0
        found: [u8; 4],
    },

    /// Unknown format version (only raised in strict mode)
    #[error("Unsupported GMA version: {0}")]
    UnsupportedVersion(u8),

    /// File table is malformed
    #[error("Invalid file table: {0}")]
    BadFileTable(String),

    /// Header or content region runs past the end of the source
    #[error("Archive truncated: need at least {required} bytes, source has {actual}")]
    Truncated {
        /// Bytes required by the header and file table
        required: u64,
        /// Bytes actually available
        actual: u64,
    },

    /// Entry path would escape the destination directory
    #[error("Unsafe path in archive: {0}")]
    UnsafePath(String),

    /// Entry range does not fit the source it is being extracted from
    #[error("Entry {path} (offset {offset}, length {length}) exceeds source of {source_len} bytes")]
    OutOfBounds {
        /// Entry path
        path: String,
        /// Entry offset
        offset: u64,
        /// Entry length
        length: u64,
        /// Length of the source being read
        source_len: u64,
    },

    /// Writing a single entry failed
    #[error("Failed to extract {path}: {source}")]
    Extract {
        /// Entry that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Operation stopped by the caller's cancellation flag
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Create a new BadFileTable error
    pub fn bad_file_table<S: Into<String>>(msg: S) -> Self {
        Error::BadFileTable(msg.into())
    }

    /// Create a new Extract error for the given entry
    pub fn extract<S: Into<String>>(path: S, source: io::Error) -> Self {
        Error::Extract {
            path: path.into(),
            source,
        }
    }

    /// Check if this error means the archive itself is malformed
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::BadMagic { .. }
                | Error::UnsupportedVersion(_)
                | Error::BadFileTable(_)
                | Error::Truncated { .. }
        )
    }

    /// Path of the entry involved, if any
    pub fn entry_path(&self) -> Option<&str> {
        match self {
            Error::UnsafePath(path)
            | Error::OutOfBounds { path, .. }
            | Error::Extract { path, .. } => Some(path),
            _ => None,
        }
    }
}
