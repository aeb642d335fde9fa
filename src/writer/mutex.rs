use super::LevelWriter;
use crate::level::Level;
use parking_lot::Mutex;
use std::io;

/// Serialize all the calls to the wrapped writer with one lock.
///
/// The bytes of a record are written while holding the lock, so records from concurrent
/// callers never interleave.
pub struct MutexWriter<W> {
    inner: Mutex<W>,
}

impl<W: LevelWriter> MutexWriter<W> {
    pub fn new(w: W) -> Self {
        Self { inner: Mutex::new(w) }
    }

    #[inline]
    pub fn write_level(&self, level: Level, data: &[u8]) -> io::Result<usize> {
        self.inner.lock().write_level(level, data)
    }

    #[inline]
    pub fn write(&self, data: &[u8]) -> io::Result<usize> {
        self.inner.lock().write(data)
    }

    pub fn flush(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }

    pub fn close(&self) -> io::Result<()> {
        self.inner.lock().close()
    }

    /// Run `f` with the wrapped writer while holding the lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W: LevelWriter> LevelWriter for MutexWriter<W> {
    #[inline]
    fn write_level(&mut self, level: Level, data: &[u8]) -> io::Result<usize> {
        self.inner.get_mut().write_level(level, data)
    }

    #[inline]
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.inner.get_mut().write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.get_mut().flush()
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.get_mut().close()
    }

    fn inner_mut(&mut self) -> Option<&mut dyn LevelWriter> {
        Some(self.inner.get_mut())
    }
}
