use super::LevelWriter;
use crate::level::Level;
use std::io;

/// Drop the records below a level, pass the others to the wrapped writer.
///
/// The dropped records still report their full length as written.
pub struct LevelFilterWriter<W: LevelWriter> {
    inner: W,
    level: Level,
}

impl<W: LevelWriter> LevelFilterWriter<W> {
    pub fn new(level: Level, inner: W) -> Self {
        Self { inner, level }
    }
}

impl<W: LevelWriter> LevelWriter for LevelFilterWriter<W> {
    #[inline]
    fn write_level(&mut self, level: Level, data: &[u8]) -> io::Result<usize> {
        if level < self.level {
            return Ok(data.len());
        }
        self.inner.write_level(level, data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }

    fn inner_mut(&mut self) -> Option<&mut dyn LevelWriter> {
        Some(&mut self.inner)
    }
}
