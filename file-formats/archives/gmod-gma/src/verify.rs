//! CRC-32 verification of archive contents

use crate::{Archive, Result, archive::check_bounds, io::stream_len};
use std::io::{Read, Seek, SeekFrom};

/// A file whose contents do not match the stored checksum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumMismatch {
    /// Entry path
    pub path: String,
    /// CRC stored in the file table
    pub expected: u32,
    /// CRC of the stored contents
    pub actual: u32,
}

/// Outcome of verifying every entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Entries whose CRC was checked
    pub checked: usize,
    /// Entries without a recorded CRC
    pub skipped: usize,
    /// Entries that failed the check
    pub mismatches: Vec<ChecksumMismatch>,
}

impl VerifyReport {
    /// Whether every checked entry matched
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl Archive {
    /// Recompute the CRC-32 of every entry and compare it to the table
    ///
    /// A stored CRC of zero means the writer did not record one; such
    /// entries are counted as skipped.
    pub fn verify<R: Read + Seek>(&self, source: &mut R) -> Result<VerifyReport> {
        let source_len = stream_len(source)?;
        let mut report = VerifyReport::default();
        let mut buffer = vec![0u8; 64 * 1024];

        for entry in self.entries() {
            if entry.crc == 0 {
                report.skipped += 1;
                continue;
            }
            check_bounds(entry, source_len)?;

            source.seek(SeekFrom::Start(entry.offset))?;
            let mut hasher = crc32fast::Hasher::new();
            let mut remaining = entry.size;
            while remaining > 0 {
                let chunk = remaining.min(buffer.len() as u64) as usize;
                source.read_exact(&mut buffer[..chunk])?;
                hasher.update(&buffer[..chunk]);
                remaining -= chunk as u64;
            }

            let actual = hasher.finalize();
            report.checked += 1;
            if actual != entry.crc {
                log::warn!(
                    "CRC mismatch for {}: expected {:08x}, got {actual:08x}",
                    entry.path,
                    entry.crc
                );
                report.mismatches.push(ChecksumMismatch {
                    path: entry.path.clone(),
                    expected: entry.crc,
                    actual,
                });
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::GmaBuilder;
    use std::io::Cursor;

    #[test]
    fn test_verify_clean_archive() {
        let data = GmaBuilder::new("Clean")
            .file("a.txt", b"alpha")
            .file("b.txt", b"beta")
            .build();
        let archive = Archive::from_bytes(&data).unwrap();

        let report = archive.verify(&mut Cursor::new(data.as_slice())).unwrap();
        assert!(report.is_ok());
        assert_eq!(report.checked, 2);
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn test_verify_detects_corruption() {
        let mut data = GmaBuilder::new("Dirty").file("a.txt", b"alpha").build();
        let last = data.len() - 1;
        data[last] ^= 0xFF;
        let archive = Archive::from_bytes(&data).unwrap();

        let report = archive.verify(&mut Cursor::new(data.as_slice())).unwrap();
        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.mismatches[0].path, "a.txt");
        assert_eq!(report.mismatches[0].expected, crc32fast::hash(b"alpha"));
    }

    #[test]
    fn test_verify_skips_unrecorded_crc() {
        let data = GmaBuilder::new("NoCrc")
            .file("a.txt", b"alpha")
            .without_crc()
            .build();
        let archive = Archive::from_bytes(&data).unwrap();

        let report = archive.verify(&mut Cursor::new(data.as_slice())).unwrap();
        assert_eq!(report.checked, 0);
        assert_eq!(report.skipped, 1);
        assert!(report.is_ok());
    }
}
