//! Workshop download pipeline
//!
//! For each ID: look up the item, download its compressed bundle, unpack it
//! into a `.gma` package, validate the package and optionally extract it.

use crate::decompress::decompress_bundle;
use crate::metadata::{ItemLookup, MetadataClient, WorkshopItem};
use crate::transport::Transport;
use crate::{Error, Result};
use gmod_gma::progress::NestedSink;
use gmod_gma::{Archive, ExtractOptions, ProgressSink, path::directory_name};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::TempPath;

/// Extension of the transient compressed bundle
pub const BUNDLE_EXTENSION: &str = "gma.lzma";

/// Extension of the decompressed package
pub const PACKAGE_EXTENSION: &str = "gma";

/// Local paths used while processing one content ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Content ID
    pub id: u64,
    /// Compressed bundle, deleted once decompression has been attempted
    pub bundle_path: PathBuf,
    /// Decompressed package, kept
    pub package_path: PathBuf,
    /// Extraction directory, when extracting
    pub extract_dir: Option<PathBuf>,
}

impl DownloadTarget {
    /// Paths for `id` under `destination`
    pub fn new(id: u64, destination: &Path) -> Self {
        Self {
            id,
            bundle_path: destination.join(format!("{id}.{BUNDLE_EXTENSION}")),
            package_path: destination.join(format!("{id}.{PACKAGE_EXTENSION}")),
            extract_dir: None,
        }
    }

    /// Set the extraction directory from the item title
    ///
    /// A title that sanitizes to nothing, or only to dots, falls back to
    /// the ID.
    pub fn extract_into(mut self, destination: &Path, title: &str) -> Self {
        let name = directory_name(title).unwrap_or_else(|| self.id.to_string());
        self.extract_dir = Some(destination.join(name));
        self
    }
}

/// What happened to one requested ID
#[derive(Debug)]
pub enum DownloadOutcome {
    /// Package downloaded and validated
    Downloaded {
        /// Item details
        item: WorkshopItem,
        /// Path of the `.gma` package
        package: PathBuf,
        /// Files in the package
        file_count: usize,
        /// Extraction directory and number of files written, if extracted
        extracted: Option<(PathBuf, usize)>,
    },
    /// Item no longer exists upstream
    Missing {
        /// Content ID
        id: u64,
    },
    /// Processing this ID failed; the run continued
    Failed {
        /// Content ID
        id: u64,
        /// Reason
        error: Error,
    },
    /// Not processed because the run was cancelled
    Cancelled {
        /// Content ID
        id: u64,
    },
}

impl DownloadOutcome {
    /// Content ID this outcome is for
    pub fn id(&self) -> u64 {
        match self {
            DownloadOutcome::Downloaded { item, .. } => item.id,
            DownloadOutcome::Missing { id }
            | DownloadOutcome::Failed { id, .. }
            | DownloadOutcome::Cancelled { id } => *id,
        }
    }

    /// Whether the package was downloaded
    pub fn is_downloaded(&self) -> bool {
        matches!(self, DownloadOutcome::Downloaded { .. })
    }
}

/// Downloads Workshop items into a directory
#[derive(Debug)]
pub struct DownloadPipeline<T> {
    client: MetadataClient<T>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<T: Transport> DownloadPipeline<T> {
    /// Create a pipeline using `client` for lookups and downloads
    pub fn new(client: MetadataClient<T>) -> Self {
        Self {
            client,
            cancel: None,
        }
    }

    /// Stop between items (and between extracted files) once `flag` is set
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Metadata client used by the pipeline
    pub fn client(&self) -> &MetadataClient<T> {
        &self.client
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Download every ID into `destination`, sequentially
    ///
    /// The metadata lookup is a single request; its failure is the only
    /// error returned for the whole run. Each ID then gets exactly one
    /// outcome, in request order.
    pub fn run(
        &self,
        ids: &[u64],
        destination: &Path,
        extract: bool,
        sink: &mut dyn ProgressSink,
    ) -> Result<Vec<DownloadOutcome>> {
        let result = self.run_all(ids, destination, extract, sink);
        sink.finished();
        result
    }

    fn run_all(
        &self,
        ids: &[u64],
        destination: &Path,
        extract: bool,
        sink: &mut dyn ProgressSink,
    ) -> Result<Vec<DownloadOutcome>> {
        sink.message(&format!("Fetching details for {} items...", ids.len()));
        let lookups = self.client.fetch(ids)?;
        std::fs::create_dir_all(destination)?;

        let mut outcomes = Vec::with_capacity(ids.len());
        for &id in ids {
            if self.is_cancelled() {
                outcomes.push(DownloadOutcome::Cancelled { id });
                continue;
            }

            let Some(ItemLookup::Found(item)) = lookups.get(&id).cloned() else {
                sink.message(&format!("Addon {id} does not exist!"));
                outcomes.push(DownloadOutcome::Missing { id });
                continue;
            };

            let mut target = DownloadTarget::new(id, destination);
            if extract {
                target = target.extract_into(destination, &item.title);
            }

            match self.process(&target, &item, sink) {
                Ok((file_count, extracted)) => outcomes.push(DownloadOutcome::Downloaded {
                    item,
                    package: target.package_path,
                    file_count,
                    extracted,
                }),
                Err(error) => {
                    log::warn!("Workshop item {id} failed: {error}");
                    sink.message(&format!("Failed to download {id}: {error}"));
                    outcomes.push(DownloadOutcome::Failed { id, error });
                }
            }
        }

        Ok(outcomes)
    }

    fn process(
        &self,
        target: &DownloadTarget,
        item: &WorkshopItem,
        sink: &mut dyn ProgressSink,
    ) -> Result<(usize, Option<(PathBuf, usize)>)> {
        if item.file_url.is_empty() {
            return Err(Error::NoDownloadUrl(target.id));
        }

        sink.message(&format!("Downloading '{}' from the workshop", item.title));
        log::info!("Downloading workshop item {} from {}", target.id, item.file_url);

        // Removed on drop, so early returns cannot leak the bundle
        let bundle = TempPath::from_path(target.bundle_path.clone());
        self.client
            .transport()
            .download(&item.file_url, &bundle)?;

        sink.message(&format!(
            "Downloaded '{}' from the workshop. Decompressing...",
            item.title
        ));
        let decompressed = decompress_bundle(&bundle, &target.package_path);
        if let Err(e) = bundle.close() {
            log::warn!(
                "Could not remove bundle {}: {e}",
                target.bundle_path.display()
            );
        }
        let size = decompressed?;
        log::debug!("Package {} is {size} bytes", target.package_path.display());

        let mut source = BufReader::new(File::open(&target.package_path)?);
        let archive = Archive::parse(&mut source)?;
        sink.message(&format!(
            "Verified {} ({} files)",
            target.package_path.display(),
            archive.len()
        ));

        let Some(extract_dir) = &target.extract_dir else {
            return Ok((archive.len(), None));
        };

        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }

        sink.message(&format!("Extracting to {}", extract_dir.display()));
        let mut options = ExtractOptions::new();
        if let Some(flag) = &self.cancel {
            options = options.cancel_flag(Arc::clone(flag));
        }
        let written = gmod_gma::extract(
            &archive,
            &mut source,
            extract_dir,
            &options,
            &mut NestedSink::new(sink),
        )?;

        Ok((archive.len(), Some((extract_dir.clone(), written))))
    }
}
