//! Output batching.
//!
//! A frame is assembled in memory and handed to the terminal in one write,
//! so a half-drawn frame is never visible.

use std::io::{self, Write};

/// Room for a full redraw of a typical canvas without regrowing.
const FRAME_CAPACITY: usize = 16 * 1024;

/// Escape sequences and glyphs for one frame, waiting to be flushed.
#[derive(Debug)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::with_capacity(FRAME_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Hand everything to `writer` and empty the buffer.
    ///
    /// Does not flush `writer`; the caller decides when the frame is done.
    pub fn flush_to<W: Write + ?Sized>(&mut self, writer: &mut W) -> io::Result<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        writer.write_all(&self.data)?;
        self.data.clear();
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_to_drains() {
        let mut buf = OutputBuffer::with_capacity(8);
        write!(buf, "fra").unwrap();
        buf.write_all(b"me").unwrap();

        let mut sink = Vec::new();
        buf.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"frame");

        // Nothing buffered, nothing written.
        buf.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"frame");
    }

    #[test]
    fn test_empty_flush_skips_writer() {
        struct Refuses;
        impl Write for Refuses {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        OutputBuffer::new().flush_to(&mut Refuses).unwrap();
    }
}
