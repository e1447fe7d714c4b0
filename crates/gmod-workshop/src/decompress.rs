//! Decompression of downloaded Workshop bundles

use crate::{Error, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// Decompress the LZMA bundle at `bundle` into `package`
///
/// Bundles are plain LZMA-alone streams; XZ containers are accepted as a
/// fallback. Returns the size of the package. On failure no partial
/// package is left behind.
pub fn decompress_bundle(bundle: &Path, package: &Path) -> Result<u64> {
    let result = decompress_into(bundle, package);
    if result.is_err()
        && package.exists()
        && let Err(e) = fs::remove_file(package)
    {
        log::warn!("Could not remove partial package {}: {e}", package.display());
    }
    result
}

fn decompress_into(bundle: &Path, package: &Path) -> Result<u64> {
    let mut input = BufReader::new(File::open(bundle)?);
    let mut output = BufWriter::new(File::create(package)?);

    if let Err(lzma_err) = lzma_rs::lzma_decompress(&mut input, &mut output) {
        log::debug!("LZMA decode of {} failed ({lzma_err:?}), trying XZ", bundle.display());

        input.seek(SeekFrom::Start(0))?;
        let mut output_file = output.into_inner().map_err(|e| e.into_error())?;
        output_file.set_len(0)?;
        output_file.seek(SeekFrom::Start(0))?;
        output = BufWriter::new(output_file);

        lzma_rs::xz_decompress(&mut input, &mut output).map_err(|xz_err| Error::Decompression {
            path: bundle.to_path_buf(),
            reason: format!("LZMA: {lzma_err:?}, XZ: {xz_err:?}"),
        })?;
    }

    output.flush()?;
    let written = output.get_ref().metadata()?.len();
    log::debug!("Decompressed {} into {written} bytes", bundle.display());
    Ok(written)
}
