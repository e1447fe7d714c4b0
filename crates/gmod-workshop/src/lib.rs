//! # gmod_workshop - Steam Workshop client for Garry's Mod addons
//!
//! Looks up published items in batches and downloads them as `.gma`
//! packages, optionally extracting each into a folder named after the
//! item.
//!
//! ```no_run
//! use gmod_gma::progress::LogSink;
//! use gmod_workshop::{DownloadPipeline, HttpTransport, MetadataClient, WorkshopConfig};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), gmod_workshop::Error> {
//! let config = WorkshopConfig::default();
//! let client = MetadataClient::new(HttpTransport::new(&config)?, config.api_url.clone());
//! let pipeline = DownloadPipeline::new(client);
//!
//! for outcome in pipeline.run(&[104815552], Path::new("addons"), true, &mut LogSink)? {
//!     println!("{}: downloaded = {}", outcome.id(), outcome.is_downloaded());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! All network access goes through the [`Transport`] trait;
//! [`HttpTransport`] is the production implementation.

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod config;
pub mod decompress;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod transport;

pub use config::{DEFAULT_API_URL, WorkshopConfig};
pub use decompress::decompress_bundle;
pub use error::{Error, Result};
pub use metadata::{ItemLookup, MetadataClient, WorkshopItem, WorkshopTag};
pub use pipeline::{DownloadOutcome, DownloadPipeline, DownloadTarget};
pub use transport::{HttpTransport, Transport};
