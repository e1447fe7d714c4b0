//! Low-level readers shared by the header and file table parsers

use crate::Result;
use std::io::{self, BufRead, Seek, SeekFrom};

/// Helper trait for reading the null-terminated strings GMA uses everywhere
pub(crate) trait ReadCString: BufRead {
    /// Read bytes up to and including the next NUL, returning them without it
    ///
    /// Invalid UTF-8 is replaced rather than rejected; addon authors routinely
    /// store Latin-1 text in names and descriptions.
    fn read_cstring(&mut self) -> Result<String> {
        let mut buf = Vec::new();
        self.read_until(0, &mut buf)?;
        if buf.pop() != Some(0) {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "unterminated string",
            )
            .into());
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl<R: BufRead + ?Sized> ReadCString for R {}

/// Total length of a seekable stream, restoring the current position
pub(crate) fn stream_len<S: Seek + ?Sized>(stream: &mut S) -> io::Result<u64> {
    let current = stream.stream_position()?;
    let len = stream.seek(SeekFrom::End(0))?;
    if current != len {
        stream.seek(SeekFrom::Start(current))?;
    }
    Ok(len)
}
