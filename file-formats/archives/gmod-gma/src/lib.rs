//! # gmod_gma - Garry's Mod Addon Archive Library
//!
//! Reader and extractor for GMA (`GMAD`) archives, the container Garry's Mod
//! uses for Workshop addons.
//!
//! ## Features
//!
//! - Parses every known format version (1-3), tolerating newer ones
//! - Derives file offsets and validates them against the source length
//! - Best-effort decoding of the JSON payload gmad embeds in descriptions
//! - Streaming extraction with path traversal protection and cancellation
//! - Folder hierarchy with aggregated sizes for browsing
//! - CRC-32 verification of stored files
//!
//! ## Examples
//!
//! ```no_run
//! use gmod_gma::{Archive, ExtractOptions, hierarchy, progress::LogSink};
//! use std::fs::File;
//! use std::io::BufReader;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), gmod_gma::Error> {
//! let mut source = BufReader::new(File::open("addon.gma")?);
//! let archive = Archive::parse(&mut source)?;
//!
//! println!("{} by {}", archive.metadata().name, archive.metadata().author_id);
//!
//! let tree = hierarchy::build(archive.entries());
//! println!("{} bytes in {} files", tree.size, tree.file_count());
//!
//! let written = gmod_gma::extract(
//!     &archive,
//!     &mut source,
//!     Path::new("out"),
//!     &ExtractOptions::new(),
//!     &mut LogSink,
//! )?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod archive;
pub mod error;
pub mod extract;
pub mod header;
pub mod hierarchy;
mod io;
pub mod path;
pub mod progress;
pub mod verify;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export commonly used types
pub use archive::{Archive, FileEntry, OpenOptions};
pub use error::{Error, Result};
pub use extract::{ExtractOptions, extract, extract_file};
pub use header::{AddonMetadata, DescriptionInfo, FormatVersion, GMA_SIGNATURE};
pub use hierarchy::HierarchyNode;
pub use progress::ProgressSink;
pub use verify::{ChecksumMismatch, VerifyReport};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature() {
        assert_eq!(&GMA_SIGNATURE, b"GMAD");
    }

    #[test]
    fn test_parse_then_browse() {
        let data = test_utils::GmaBuilder::new("Browse")
            .file("lua/init.lua", &[0u8; 10])
            .file("lua/sub/a.lua", &[0u8; 5])
            .build();
        let archive = Archive::from_bytes(&data).unwrap();
        let tree = hierarchy::build(archive.entries());

        assert_eq!(tree.size, archive.total_size());
        assert_eq!(tree.find("lua").map(|n| n.size), Some(15));
    }
}
