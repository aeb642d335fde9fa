//! Level aware writers.
//!
//! A logger hands each encoded record to a [LevelWriter] together with its level. Writers
//! compose: [MutexWriter] serializes the callers, [BufferedWriter] merges small writes,
//! [LevelSplitWriter] routes by level, and [SizedRotatingFile] is the usual terminal writer.

mod buffered;
mod filter;
mod mutex;
mod rotating;
mod size;
mod split;
mod stream;

pub use buffered::*;
pub use filter::*;
pub use mutex::*;
pub use rotating::*;
pub use size::*;
pub use split::*;
pub use stream::*;

use crate::level::Level;
use enum_dispatch::enum_dispatch;
use std::io;

/// A writer receiving the level of each record.
///
/// Writers are not required to be thread-safe, wrap them into a [MutexWriter] to share them.
#[enum_dispatch]
pub trait LevelWriter: Send {
    fn write_level(&mut self, level: Level, data: &[u8]) -> io::Result<usize>;

    /// Write without level, treated as [Level::INFO].
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.write_level(Level::INFO, data)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Release the resources. Calling it again is a no-op.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// The wrapped writer, if this one is a wrapper.
    fn inner_mut(&mut self) -> Option<&mut dyn LevelWriter> {
        None
    }
}

impl<W: LevelWriter + ?Sized> LevelWriter for Box<W> {
    #[inline]
    fn write_level(&mut self, level: Level, data: &[u8]) -> io::Result<usize> {
        (**self).write_level(level, data)
    }

    #[inline]
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        (**self).write(data)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    #[inline]
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }

    #[inline]
    fn inner_mut(&mut self) -> Option<&mut dyn LevelWriter> {
        (**self).inner_mut()
    }
}

/// Walk down the wrapped writers until the innermost one.
pub fn unwrap_writer(w: &mut dyn LevelWriter) -> &mut dyn LevelWriter {
    // Probe first, a returned borrow of inner_mut() would outlive the fallback branch.
    if w.inner_mut().is_none() {
        return w;
    }
    match w.inner_mut() {
        Some(inner) => unwrap_writer(inner),
        None => unreachable!(),
    }
}

/// The terminal writers, statically dispatched.
#[enum_dispatch(LevelWriter)]
pub enum Sink {
    Rotating(SizedRotatingFile),
    Console(ConsoleWriter),
    Discard(DiscardWriter),
}
