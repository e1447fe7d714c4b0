//! GMA archive handling
//!
//! This module provides the main Archive type for reading GMA files.
//! An archive is parsed once into its metadata and file table; the file
//! contents are never buffered. Readers and extractors take the source
//! stream again so one parsed table can serve any number of reads.

use crate::{
    Error, Result,
    header::{self, AddonMetadata, GMA_SIGNATURE},
    io::{ReadCString, stream_len},
};
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// Default upper bound on file table entries
pub const DEFAULT_MAX_FILE_COUNT: usize = 1_000_000;

/// Options for opening GMA archives
///
/// # Examples
///
/// ```no_run
/// use gmod_gma::{Archive, OpenOptions};
///
/// // Open with default options
/// let archive = Archive::open("addon.gma")?;
///
/// // Refuse versions this library does not know about
/// let archive = OpenOptions::new()
///     .strict_version(true)
///     .open("addon.gma")?;
/// # Ok::<(), gmod_gma::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct OpenOptions {
    strict_version: bool,
    max_file_count: usize,
}

impl OpenOptions {
    /// Create new default options
    pub fn new() -> Self {
        Self {
            strict_version: false,
            max_file_count: DEFAULT_MAX_FILE_COUNT,
        }
    }

    /// Fail with [`Error::UnsupportedVersion`] on unknown version bytes
    /// instead of parsing them with the nearest known layout
    pub fn strict_version(mut self, strict: bool) -> Self {
        self.strict_version = strict;
        self
    }

    /// Maximum number of file table entries accepted
    pub fn max_file_count(mut self, count: usize) -> Self {
        self.max_file_count = count;
        self
    }

    /// Open and parse an archive from disk
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<Archive> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        self.parse(&mut reader)
    }

    /// Parse an archive held in memory
    pub fn from_bytes(&self, data: &[u8]) -> Result<Archive> {
        self.parse(&mut Cursor::new(data))
    }

    /// Parse an archive starting at the reader's current position
    pub fn parse<R: BufRead + Seek>(&self, reader: &mut R) -> Result<Archive> {
        let mut magic = [0u8; 4];
        if let Err(e) = reader.read_exact(&mut magic) {
            return Err(truncated_or_io(e, reader, 4));
        }
        if magic != GMA_SIGNATURE {
            return Err(Error::BadMagic { found: magic });
        }

        let source_len = stream_len(reader)?;
        match self.parse_body(reader, source_len) {
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(Error::Truncated {
                    required: source_len + 1,
                    actual: source_len,
                })
            }
            result => result,
        }
    }

    fn parse_body<R: BufRead + Seek>(&self, reader: &mut R, source_len: u64) -> Result<Archive> {
        let version = reader.read_u8()?;
        let metadata = header::read_header(reader, version, self.strict_version)?;
        let mut entries = read_file_table(reader, self.max_file_count)?;
        let content_start = reader.stream_position()?;

        let mut offset = content_start;
        for entry in &mut entries {
            entry.offset = offset;
            offset = offset.checked_add(entry.size).ok_or(Error::Truncated {
                required: u64::MAX,
                actual: source_len,
            })?;
        }

        if offset > source_len {
            return Err(Error::Truncated {
                required: offset,
                actual: source_len,
            });
        }

        log::debug!(
            "Parsed GMA {:?}: {} files, content at {content_start}, {} bytes of content",
            metadata.name,
            entries.len(),
            offset - content_start
        );

        Ok(Archive {
            metadata,
            entries,
            content_start,
            source_len,
        })
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self::new()
    }
}

fn truncated_or_io<S: Seek>(e: io::Error, reader: &mut S, required: u64) -> Error {
    if e.kind() != io::ErrorKind::UnexpectedEof {
        return e.into();
    }
    match stream_len(reader) {
        Ok(actual) => Error::Truncated { required, actual },
        Err(e) => e.into(),
    }
}

/// Read file table records up to the zero terminator
///
/// Offsets are left at zero; the caller derives them once the content
/// start is known.
fn read_file_table<R: BufRead>(reader: &mut R, max_file_count: usize) -> Result<Vec<FileEntry>> {
    let mut entries: Vec<FileEntry> = Vec::new();

    loop {
        let index = reader.read_i32::<LittleEndian>()?;
        if index == 0 {
            break;
        }

        let previous = entries.last().map_or(0, |e| e.index);
        if index < 0 || index as u32 <= previous {
            return Err(Error::bad_file_table(format!(
                "file index {index} follows {previous}"
            )));
        }
        if entries.len() >= max_file_count {
            return Err(Error::bad_file_table(format!(
                "more than {max_file_count} entries"
            )));
        }

        let path = reader.read_cstring()?;
        let size = reader.read_i64::<LittleEndian>()?;
        let crc = reader.read_u32::<LittleEndian>()?;

        if path.is_empty() {
            return Err(Error::bad_file_table(format!("entry {index} has no path")));
        }
        if size < 0 {
            return Err(Error::bad_file_table(format!(
                "entry {path} has negative size {size}"
            )));
        }

        entries.push(FileEntry {
            index: index as u32,
            path,
            size: size as u64,
            crc,
            offset: 0,
        });
    }

    Ok(entries)
}

/// A file stored in a GMA archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// 1-based position in the file table
    pub index: u32,
    /// Relative path, forward-slash separated
    pub path: String,
    /// Uncompressed size in bytes
    pub size: u64,
    /// CRC-32 of the contents (0 when the writer did not record one)
    pub crc: u32,
    /// Absolute offset of the contents within the source
    pub offset: u64,
}

impl FileEntry {
    /// Number of bytes the entry occupies in the content region
    pub fn length(&self) -> u64 {
        self.size
    }

    /// Offset one past the last byte of the entry
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }

    /// Final path segment
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// A parsed GMA archive
#[derive(Debug, Clone)]
pub struct Archive {
    metadata: AddonMetadata,
    entries: Vec<FileEntry>,
    content_start: u64,
    source_len: u64,
}

impl Archive {
    /// Open and parse an archive from disk with default options
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        OpenOptions::new().open(path)
    }

    /// Parse an archive held in memory with default options
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        OpenOptions::new().from_bytes(data)
    }

    /// Parse an archive from a reader with default options
    pub fn parse<R: BufRead + Seek>(reader: &mut R) -> Result<Self> {
        OpenOptions::new().parse(reader)
    }

    /// Addon metadata from the header
    pub fn metadata(&self) -> &AddonMetadata {
        &self.metadata
    }

    /// File table in archive order
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive holds no files
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Offset at which file contents begin
    pub fn content_start(&self) -> u64 {
        self.content_start
    }

    /// Length of the source the archive was parsed from
    pub fn source_len(&self) -> u64 {
        self.source_len
    }

    /// Sum of all file sizes
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }

    /// Look up an entry by its exact relative path
    pub fn find(&self, path: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Read one entry's contents from the source
    pub fn read_entry<R: Read + Seek>(&self, source: &mut R, entry: &FileEntry) -> Result<Vec<u8>> {
        let source_len = stream_len(source)?;
        check_bounds(entry, source_len)?;

        source.seek(SeekFrom::Start(entry.offset))?;
        let mut data = vec![0u8; entry.size as usize];
        source.read_exact(&mut data)?;
        Ok(data)
    }

    /// Read a file by path
    pub fn read_file<R: Read + Seek>(&self, source: &mut R, path: &str) -> Result<Option<Vec<u8>>> {
        match self.find(path) {
            Some(entry) => self.read_entry(source, entry).map(Some),
            None => Ok(None),
        }
    }
}

/// Ensure an entry lies entirely inside a source of `source_len` bytes
pub(crate) fn check_bounds(entry: &FileEntry, source_len: u64) -> Result<()> {
    match entry.offset.checked_add(entry.size) {
        Some(end) if end <= source_len => Ok(()),
        _ => Err(Error::OutOfBounds {
            path: entry.path.clone(),
            offset: entry.offset,
            length: entry.size,
            source_len,
        }),
    }
}
