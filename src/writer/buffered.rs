use super::LevelWriter;
use crate::level::Level;
use std::io;

/// Limit to 4k, so that a record is not broken across two writes in most cases.
pub const FLUSH_SIZE_DEFAULT: usize = 4096;

/// Merge the records into a memory buffer, and write them to the wrapped writer in one go.
///
/// The buffer is written when it reaches the flush size. A record is never split: when it does
/// not fit, the pending bytes are written first.
///
/// **Call [LevelWriter::flush] or [LevelWriter::close] before exiting, or the tail is lost.**
///
/// The levels are not kept, the wrapped writer receives the merged bytes through
/// [LevelWriter::write].
///
/// After [LevelWriter::close], writes and flushes fail instead of filling the buffer.
pub struct BufferedWriter<W: LevelWriter> {
    inner: W,
    buf: Vec<u8>,
    flush_size: usize,
    closed: bool,
}

impl<W: LevelWriter> BufferedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_flush_size(inner, FLUSH_SIZE_DEFAULT)
    }

    /// A zero flush size falls back to the default.
    pub fn with_flush_size(inner: W, mut flush_size: usize) -> Self {
        if flush_size == 0 {
            flush_size = FLUSH_SIZE_DEFAULT;
        }
        Self { inner, buf: Vec::with_capacity(flush_size), flush_size, closed: false }
    }

    /// Bytes waiting in the buffer.
    #[inline]
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn flush_buf(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let r = write_all(&mut self.inner, &self.buf);
        self.buf.clear();
        r
    }
}

fn write_all<W: LevelWriter + ?Sized>(w: &mut W, mut data: &[u8]) -> io::Result<()> {
    while !data.is_empty() {
        match w.write(data) {
            Ok(0) => return Err(io::Error::new(io::ErrorKind::WriteZero, "failed to write buffer")),
            Ok(n) => data = &data[n..],
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "the buffered writer has been closed")
}

impl<W: LevelWriter> LevelWriter for BufferedWriter<W> {
    fn write_level(&mut self, _level: Level, data: &[u8]) -> io::Result<usize> {
        if self.closed {
            return Err(closed_error());
        }
        if self.buf.len() + data.len() > self.flush_size {
            self.flush_buf()?;
        }
        self.buf.extend_from_slice(data);
        if self.buf.len() >= self.flush_size {
            self.flush_buf()?;
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.closed {
            return Err(closed_error());
        }
        self.flush_buf()?;
        self.inner.flush()
    }

    /// Closing again is a no-op.
    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let r = self.flush_buf();
        let r2 = self.inner.close();
        r.and(r2)
    }

    fn inner_mut(&mut self) -> Option<&mut dyn LevelWriter> {
        Some(&mut self.inner)
    }
}

impl<W: LevelWriter> Drop for BufferedWriter<W> {
    fn drop(&mut self) {
        if let Err(e) = self.flush_buf() {
            eprintln!("levelog: flush buffered records on drop failed: {:?}", e);
        }
    }
}
