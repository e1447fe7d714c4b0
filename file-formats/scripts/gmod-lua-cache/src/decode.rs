//! Decoding of individual cache entries
//!
//! A cache entry is 4 bytes of framing followed by an LZMA stream. The
//! decompressed buffer is the Lua source plus one trailing NUL.

use crate::{Error, Result};
use std::io::{BufReader, Cursor};
use std::path::Path;

/// Bytes of framing before the compressed payload
pub const FRAMING_LEN: usize = 4;

/// Decode a raw cache entry into the original source bytes
///
/// The framing bytes are skipped without inspection and the trailing
/// sentinel byte is removed from the result.
pub fn decode(raw: &[u8]) -> Result<Vec<u8>> {
    if raw.len() <= FRAMING_LEN {
        return Err(Error::TooShort(raw.len()));
    }

    let mut output = decompress(&raw[FRAMING_LEN..])?;
    match output.pop() {
        None => Err(Error::Empty),
        Some(0) => Ok(output),
        Some(last) => {
            log::warn!("Cache entry ends with {last:#04x} instead of a NUL sentinel");
            Ok(output)
        }
    }
}

/// Read and decode a cache entry from disk
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let raw = std::fs::read(path.as_ref())?;
    decode(&raw)
}

/// Decompress an LZMA-alone stream, falling back to XZ
fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();

    match lzma_rs::lzma_decompress(&mut BufReader::new(Cursor::new(data)), &mut output) {
        Ok(()) => Ok(output),
        Err(e) => {
            let mut output = Vec::new();
            match lzma_rs::xz_decompress(&mut BufReader::new(Cursor::new(data)), &mut output) {
                Ok(()) => Ok(output),
                Err(xz_err) => {
                    log::debug!(
                        "First 16 bytes of payload: {:02X?}",
                        &data[..16.min(data.len())]
                    );
                    Err(Error::decompression(format!(
                        "LZMA: {e:?}, XZ: {xz_err:?}"
                    )))
                }
            }
        }
    }
}
