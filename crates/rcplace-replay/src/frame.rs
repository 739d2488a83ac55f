//! Line reader over the raw log
//!
//! [`FrameReader`] walks any `BufRead` source one line at a time. Line
//! terminators (`\n` or `\r\n`) are stripped, bytes that are not valid
//! UTF-8 are replaced, and a final line without a terminator is still
//! returned. Once the source is exhausted every further call reports end
//! of input.

use crate::error::Result;
use std::io::BufRead;

/// Forward-only line cursor over a log source.
///
/// Generic over `R: BufRead` so tests can use `&[u8]` and production
/// code can use `BufReader<File>`.
pub struct FrameReader<R> {
    reader: R,
    buf: Vec<u8>,
    lines_read: u64,
    exhausted: bool,
}

impl<R: BufRead> FrameReader<R> {
    /// Wrap a source
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(64),
            lines_read: 0,
            exhausted: false,
        }
    }

    /// Next line without its terminator, or `None` at end of input.
    ///
    /// Only an I/O failure of the underlying source is an error.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        if self.exhausted {
            return Ok(None);
        }

        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            self.exhausted = true;
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }

        self.lines_read += 1;
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    /// Number of lines returned so far
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// True once end of input has been reached
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
