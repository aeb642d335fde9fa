use super::LevelWriter;
use crate::level::Level;
use std::collections::BTreeMap;
use std::fmt;
use std::io;

/// All the errors met while closing several writers.
#[derive(Debug, thiserror::Error)]
pub struct CloseErrors(pub Vec<io::Error>);

impl fmt::Display for CloseErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl CloseErrors {
    /// Fold the collected errors into a result, `Ok` when there is none.
    pub fn into_result(self) -> io::Result<()> {
        match self.0.len() {
            0 => Ok(()),
            _ => Err(io::Error::other(self)),
        }
    }
}

/// Route the records to a writer chosen by their exact level.
///
/// Levels without a dedicated writer go to the default one, as well as the writes without
/// level.
///
/// ``` rust
/// use levelog::{Level, LevelSplitWriter, DiscardWriter, StreamWriter};
/// let w = LevelSplitWriter::new(DiscardWriter)
///     .level_writer(Level::ERROR, StreamWriter::new(std::io::stderr()));
/// ```
pub struct LevelSplitWriter {
    default: Box<dyn LevelWriter>,
    writers: BTreeMap<Level, Box<dyn LevelWriter>>,
}

impl LevelSplitWriter {
    pub fn new<W: LevelWriter + 'static>(default: W) -> Self {
        Self { default: Box::new(default), writers: BTreeMap::new() }
    }

    /// Register the writer of `level`, replacing the previous one.
    pub fn level_writer<W: LevelWriter + 'static>(mut self, level: Level, w: W) -> Self {
        self.writers.insert(level, Box::new(w));
        self
    }

    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        self.writers.keys().copied()
    }
}

impl LevelWriter for LevelSplitWriter {
    #[inline]
    fn write_level(&mut self, level: Level, data: &[u8]) -> io::Result<usize> {
        match self.writers.get_mut(&level) {
            Some(w) => w.write_level(level, data),
            None => self.default.write_level(level, data),
        }
    }

    #[inline]
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.default.write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut errors = Vec::new();
        if let Err(e) = self.default.flush() {
            errors.push(e);
        }
        for w in self.writers.values_mut() {
            if let Err(e) = w.flush() {
                errors.push(e);
            }
        }
        CloseErrors(errors).into_result()
    }

    /// Close the default writer then every level writer, even when some of them fail.
    fn close(&mut self) -> io::Result<()> {
        let mut errors = Vec::new();
        if let Err(e) = self.default.close() {
            errors.push(e);
        }
        for w in self.writers.values_mut() {
            if let Err(e) = w.close() {
                errors.push(e);
            }
        }
        CloseErrors(errors).into_result()
    }

    fn inner_mut(&mut self) -> Option<&mut dyn LevelWriter> {
        Some(self.default.as_mut())
    }
}

/// Write every record to all the writers.
///
/// A failing writer does not stop the others, the errors are returned together.
#[derive(Default)]
pub struct MultiWriter {
    writers: Vec<Box<dyn LevelWriter>>,
}

impl MultiWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<W: LevelWriter + 'static>(mut self, w: W) -> Self {
        self.writers.push(Box::new(w));
        self
    }

    pub fn push(&mut self, w: Box<dyn LevelWriter>) {
        self.writers.push(w);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.writers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }
}

impl LevelWriter for MultiWriter {
    fn write_level(&mut self, level: Level, data: &[u8]) -> io::Result<usize> {
        let mut errors = Vec::new();
        for w in self.writers.iter_mut() {
            if let Err(e) = w.write_level(level, data) {
                errors.push(e);
            }
        }
        CloseErrors(errors).into_result().map(|_| data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut errors = Vec::new();
        for w in self.writers.iter_mut() {
            if let Err(e) = w.flush() {
                errors.push(e);
            }
        }
        CloseErrors(errors).into_result()
    }

    fn close(&mut self) -> io::Result<()> {
        let mut errors = Vec::new();
        for w in self.writers.iter_mut() {
            if let Err(e) = w.close() {
                errors.push(e);
            }
        }
        CloseErrors(errors).into_result()
    }
}
