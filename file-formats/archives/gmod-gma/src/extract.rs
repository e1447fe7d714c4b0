//! Streaming extraction of archive entries to disk

use crate::{
    Archive, Error, FileEntry, Result,
    archive::check_bounds,
    io::stream_len,
    path::entry_output_path,
    progress::ProgressSink,
};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Options controlling which entries are extracted and how
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    selected: HashSet<String>,
    overwrite: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl ExtractOptions {
    /// Extract every entry, overwriting existing files
    pub fn new() -> Self {
        Self {
            selected: HashSet::new(),
            overwrite: true,
            cancel: None,
        }
    }

    /// Restrict extraction to these exact entry paths
    ///
    /// An empty selection means every entry.
    pub fn select<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Replace existing files (default) or fail on them
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Flag checked between entries; setting it stops the extraction
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Whether an entry path is part of the selection
    pub fn is_selected(&self, path: &str) -> bool {
        self.selected.is_empty() || self.selected.contains(path)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract selected entries of `archive` from `source` into `destination`
///
/// Entries are written in table order and the sink is told about each one
/// as it completes. Every selected path is validated before the first
/// write. A failure on one entry aborts the run; files already written are
/// left in place. Returns the number of files written.
pub fn extract<R: Read + Seek>(
    archive: &Archive,
    source: &mut R,
    destination: &Path,
    options: &ExtractOptions,
    sink: &mut dyn ProgressSink,
) -> Result<usize> {
    let result = extract_entries(archive, source, destination, options, sink);
    sink.finished();
    result
}

/// Open the archive at `archive_path` and extract it into `destination`
pub fn extract_file<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    destination: Q,
    options: &ExtractOptions,
    sink: &mut dyn ProgressSink,
) -> Result<usize> {
    let mut source = BufReader::new(File::open(archive_path.as_ref())?);
    let archive = Archive::parse(&mut source)?;
    extract(&archive, &mut source, destination.as_ref(), options, sink)
}

fn extract_entries<R: Read + Seek>(
    archive: &Archive,
    source: &mut R,
    destination: &Path,
    options: &ExtractOptions,
    sink: &mut dyn ProgressSink,
) -> Result<usize> {
    let entries: Vec<&FileEntry> = archive
        .entries()
        .iter()
        .filter(|e| options.is_selected(&e.path))
        .collect();

    if !options.selected.is_empty() && entries.len() < options.selected.len() {
        log::warn!(
            "{} selected paths are not in the archive",
            options.selected.len() - entries.len()
        );
    }

    let outputs = entries
        .iter()
        .map(|e| entry_output_path(destination, &e.path))
        .collect::<Result<Vec<_>>>()?;

    let source_len = stream_len(source)?;
    let mut total_bytes = 0u64;

    for (entry, output) in entries.iter().zip(&outputs) {
        if options.is_cancelled() {
            log::info!("Extraction cancelled before {}", entry.path);
            return Err(Error::Cancelled);
        }

        check_bounds(entry, source_len)?;
        write_entry(source, entry, output, options.overwrite)
            .map_err(|e| Error::extract(entry.path.as_str(), e))?;

        total_bytes += entry.size;
        log::debug!("Extracted {} ({} bytes)", entry.path, entry.size);
        sink.file_written(&entry.path, total_bytes);
    }

    Ok(entries.len())
}

fn write_entry<R: Read + Seek>(
    source: &mut R,
    entry: &FileEntry,
    output: &Path,
    overwrite: bool,
) -> io::Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut open = fs::OpenOptions::new();
    open.write(true);
    if overwrite {
        open.create(true).truncate(true);
    } else {
        open.create_new(true);
    }
    let mut writer = BufWriter::new(open.open(output)?);

    source.seek(SeekFrom::Start(entry.offset))?;
    let copied = io::copy(&mut source.by_ref().take(entry.size), &mut writer)?;
    if copied != entry.size {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("copied {copied} of {} bytes", entry.size),
        ));
    }

    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullSink;
    use crate::test_utils::GmaBuilder;
    use std::io::Cursor;

    fn sample() -> Vec<u8> {
        GmaBuilder::new("Sample")
            .file("lua/autorun/init.lua", b"print('hi')")
            .file("lua/sub/a.lua", b"return 1")
            .file("materials/logo.png", &[0x89, b'P', b'N', b'G'])
            .build()
    }

    #[test]
    fn test_extract_all() {
        let data = sample();
        let archive = Archive::from_bytes(&data).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let count = extract(
            &archive,
            &mut Cursor::new(data.as_slice()),
            dir.path(),
            &ExtractOptions::new(),
            &mut NullSink,
        )
        .unwrap();

        assert_eq!(count, 3);
        assert_eq!(
            fs::read(dir.path().join("lua/autorun/init.lua")).unwrap(),
            b"print('hi')"
        );
        assert_eq!(
            fs::read(dir.path().join("materials/logo.png")).unwrap(),
            [0x89, b'P', b'N', b'G']
        );
    }

    #[test]
    fn test_extract_selection_and_progress_order() {
        let data = sample();
        let archive = Archive::from_bytes(&data).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let mut lines = Vec::new();

        let count = extract(
            &archive,
            &mut Cursor::new(data.as_slice()),
            dir.path(),
            &ExtractOptions::new().select(["materials/logo.png", "lua/sub/a.lua"]),
            &mut |text: &str| lines.push(text.to_string()),
        )
        .unwrap();

        assert_eq!(count, 2);
        assert!(!dir.path().join("lua/autorun/init.lua").exists());
        // Table order, not selection order; running totals 8 then 12
        assert_eq!(
            lines,
            vec![
                "Extracted lua/sub/a.lua (8 bytes written)",
                "Extracted materials/logo.png (12 bytes written)",
            ]
        );
    }

    #[test]
    fn test_unsafe_path_rejected_before_any_write() {
        let data = GmaBuilder::new("Evil")
            .file("lua/ok.lua", b"fine")
            .file("../escape.lua", b"bad")
            .build();
        let archive = Archive::from_bytes(&data).unwrap();
        let root = tempfile::tempdir().unwrap();
        let dest = root.path().join("out");

        let result = extract(
            &archive,
            &mut Cursor::new(data.as_slice()),
            &dest,
            &ExtractOptions::new(),
            &mut NullSink,
        );

        assert!(matches!(result, Err(Error::UnsafePath(p)) if p == "../escape.lua"));
        assert!(!dest.join("lua/ok.lua").exists());
        assert!(!root.path().join("escape.lua").exists());
    }

    #[test]
    fn test_shorter_source_reports_out_of_bounds() {
        let data = sample();
        let archive = Archive::from_bytes(&data).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let short = &data[..data.len() - 2];

        let result = extract(
            &archive,
            &mut Cursor::new(short),
            dir.path(),
            &ExtractOptions::new(),
            &mut NullSink,
        );

        match result {
            Err(Error::OutOfBounds { path, .. }) => assert_eq!(path, "materials/logo.png"),
            other => panic!("expected OutOfBounds, got {other:?}"),
        }
        // Earlier entries stay on disk
        assert!(dir.path().join("lua/sub/a.lua").exists());
    }

    #[test]
    fn test_no_overwrite_reports_failing_file() {
        let data = sample();
        let archive = Archive::from_bytes(&data).unwrap();
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lua/sub")).unwrap();
        fs::write(dir.path().join("lua/sub/a.lua"), b"existing").unwrap();

        let result = extract(
            &archive,
            &mut Cursor::new(data.as_slice()),
            dir.path(),
            &ExtractOptions::new().overwrite(false),
            &mut NullSink,
        );

        match result {
            Err(Error::Extract { path, source }) => {
                assert_eq!(path, "lua/sub/a.lua");
                assert_eq!(source.kind(), io::ErrorKind::AlreadyExists);
            }
            other => panic!("expected Extract error, got {other:?}"),
        }
        assert_eq!(
            fs::read(dir.path().join("lua/sub/a.lua")).unwrap(),
            b"existing"
        );
    }

    #[test]
    fn test_cancel_flag_stops_between_files() {
        let data = sample();
        let archive = Archive::from_bytes(&data).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let flag = Arc::new(AtomicBool::new(false));
        let options = ExtractOptions::new().cancel_flag(flag.clone());

        let mut sink = |_: &str| flag.store(true, Ordering::Relaxed);
        let result = extract(
            &archive,
            &mut Cursor::new(data.as_slice()),
            dir.path(),
            &options,
            &mut sink,
        );

        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(dir.path().join("lua/autorun/init.lua").exists());
        assert!(!dir.path().join("lua/sub/a.lua").exists());
    }
}
