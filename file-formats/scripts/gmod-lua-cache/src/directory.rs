//! Bulk decoding of a game's Lua cache directory

use crate::{Error, Result, decode::decode_file};
use gmod_gma::ProgressSink;
use std::fs;
use std::path::{Path, PathBuf};

/// Cache directory relative to the `garrysmod` folder
pub const CACHE_SUBDIR: &str = "cache/lua";

/// Extension of cache entries
pub const CACHE_EXTENSION: &str = "lua";

/// Location of the Lua cache for a `garrysmod` folder
pub fn cache_dir(gmod_dir: &Path) -> PathBuf {
    gmod_dir.join(CACHE_SUBDIR)
}

/// Result of decoding a cache directory
#[derive(Debug, Default)]
pub struct CacheSummary {
    /// Entries decoded and written
    pub decoded: usize,
    /// Entries skipped because they were corrupt, with the reason
    pub skipped: Vec<(String, Error)>,
}

/// List cache entry file names in `cache_dir`, sorted
pub fn list_entries(cache_dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(cache_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(CACHE_EXTENSION) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Decode every cache entry in `cache_dir` into `out_dir`
///
/// When `filter` is non-empty only entries with those file names are
/// decoded. Each decoded entry is reported through
/// [`ProgressSink::file_written`]. Corrupt entries are logged and skipped;
/// I/O failures abort.
pub fn extract_directory(
    cache_dir: &Path,
    out_dir: &Path,
    filter: &[String],
    sink: &mut dyn ProgressSink,
) -> Result<CacheSummary> {
    let result = extract_entries(cache_dir, out_dir, filter, sink);
    sink.finished();
    result
}

fn extract_entries(
    cache_dir: &Path,
    out_dir: &Path,
    filter: &[String],
    sink: &mut dyn ProgressSink,
) -> Result<CacheSummary> {
    let names: Vec<String> = list_entries(cache_dir)?
        .into_iter()
        .filter(|name| filter.is_empty() || filter.contains(name))
        .collect();

    sink.message(&format!("Unpacking {} files...", names.len()));
    fs::create_dir_all(out_dir)?;

    let mut summary = CacheSummary::default();
    let mut total_bytes = 0u64;
    for name in names {
        let data = match decode_file(cache_dir.join(&name)) {
            Ok(data) => data,
            Err(e) if e.is_corrupt_entry() => {
                log::warn!("Skipping corrupt cache entry {name}: {e}");
                sink.message(&format!("Skipped {name}: {e}"));
                summary.skipped.push((name, e));
                continue;
            }
            Err(e) => return Err(e),
        };

        fs::write(out_dir.join(&name), &data)?;
        summary.decoded += 1;
        total_bytes += data.len() as u64;
        log::debug!("Unpacked {name} ({} bytes)", data.len());
        sink.file_written(&name, total_bytes);
    }

    Ok(summary)
}
