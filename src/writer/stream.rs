use super::LevelWriter;
use crate::level::Level;
use std::io::{self, Write};
use std::str::FromStr;

/// Adapt any [std::io::Write] into a [LevelWriter], ignoring the level.
pub struct StreamWriter<W: Write + Send> {
    inner: W,
}

impl<W: Write + Send> StreamWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write + Send> LevelWriter for StreamWriter<W> {
    #[inline]
    fn write_level(&mut self, _level: Level, data: &[u8]) -> io::Result<usize> {
        self.inner.write_all(data)?;
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
#[repr(i32)]
pub enum ConsoleTarget {
    Stdout = 1,
    Stderr = 2,
}

impl FromStr for ConsoleTarget {
    type Err = ();

    /// accepts case-insensitive: stdout, stderr, out, err, 1, 2
    fn from_str(s: &str) -> Result<Self, ()> {
        let v = s.to_lowercase();
        match v.as_str() {
            "stdout" | "out" | "1" => Ok(ConsoleTarget::Stdout),
            "stderr" | "err" | "2" => Ok(ConsoleTarget::Stderr),
            _ => Err(()),
        }
    }
}

/// Write the records to stdout or stderr, each record with a single locked write.
pub struct ConsoleWriter {
    target: ConsoleTarget,
}

impl ConsoleWriter {
    pub fn new(target: ConsoleTarget) -> Self {
        Self { target }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleTarget::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleTarget::Stderr)
    }

    #[inline]
    pub fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl LevelWriter for ConsoleWriter {
    #[inline]
    fn write_level(&mut self, _level: Level, data: &[u8]) -> io::Result<usize> {
        match self.target {
            ConsoleTarget::Stdout => io::stdout().lock().write_all(data)?,
            ConsoleTarget::Stderr => io::stderr().lock().write_all(data)?,
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.target {
            ConsoleTarget::Stdout => io::stdout().flush(),
            ConsoleTarget::Stderr => io::stderr().flush(),
        }
    }
}

/// Swallow everything.
#[derive(Default, Clone, Copy, Debug)]
pub struct DiscardWriter;

impl LevelWriter for DiscardWriter {
    #[inline(always)]
    fn write_level(&mut self, _level: Level, data: &[u8]) -> io::Result<usize> {
        Ok(data.len())
    }
}
