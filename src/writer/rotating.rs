use super::LevelWriter;
use crate::level::Level;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use super::size::parse_size;

pub const DEFAULT_MAX_SIZE: u64 = 100 * 1024 * 1024;

#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

fn open_file(path: &Path) -> io::Result<File> {
    let mut opts = OpenOptions::new();
    opts.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(FILE_MODE);
    }
    opts.open(path)
}

fn with_context(e: io::Error, msg: String) -> io::Error {
    io::Error::new(e.kind(), format!("{}: {}", msg, e))
}

/// A log file rotated by size, keeping a fixed number of backups.
///
/// The current file is `path`, the backups are `path.1` (the newest) to `path.N`. When a
/// write would push the file over `max_size`, the file is rotated first, so a file only
/// exceeds the limit when a single record is larger than it.
///
/// With zero backups the file is never rotated and grows without limit: losing the log
/// silently is never the outcome of a zero setting.
///
/// The file is opened on the first write and appended to, the size of an existing file counts
/// toward the limit.
///
/// It is not thread-safe, wrap it into a [MutexWriter](super::MutexWriter) to share it.
#[derive(Debug)]
pub struct SizedRotatingFile {
    path: PathBuf,
    max_size: u64,
    backups: usize,
    file: Option<File>,
    nbytes: u64,
    closed: AtomicBool,
}

impl SizedRotatingFile {
    /// A zero `max_size` falls back to [DEFAULT_MAX_SIZE].
    pub fn new<P: Into<PathBuf>>(path: P, max_size: u64, backups: usize) -> Self {
        let max_size = if backups == 0 {
            u64::MAX
        } else if max_size == 0 {
            DEFAULT_MAX_SIZE
        } else {
            max_size
        };
        Self {
            path: path.into(),
            max_size,
            backups,
            file: None,
            nbytes: 0,
            closed: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes in the current file.
    #[inline]
    pub fn size(&self) -> u64 {
        self.nbytes
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// The path of the backup `index`, starting from 1.
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut s: OsString = self.path.as_os_str().to_owned();
        s.push(format!(".{}", index));
        PathBuf::from(s)
    }

    fn open(&mut self) -> io::Result<()> {
        let f = open_file(&self.path).map_err(|e| {
            with_context(e, format!("failed to open the rotating file {:?}", self.path))
        })?;
        self.nbytes = f.metadata()?.len();
        self.file = Some(f);
        Ok(())
    }

    /// Rotate now, even though the size limit is not reached.
    pub fn rotate(&mut self) -> io::Result<()> {
        if self.is_closed() {
            return Err(closed_error());
        }
        self.do_rollover()
    }

    fn do_rollover(&mut self) -> io::Result<()> {
        // drop closes the handle
        self.file = None;

        let size = match fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                return Err(with_context(
                    e,
                    format!("failed to get the size of the rotating file {:?}", self.path),
                ));
            }
        };
        if size > 0 && self.backups > 0 {
            // From the oldest, so that no backup is overwritten before being moved.
            for i in (1..self.backups).rev() {
                let src = self.backup_path(i);
                let dst = self.backup_path(i + 1);
                if src.exists() {
                    match fs::remove_file(&dst) {
                        Ok(()) => {}
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                        Err(e) => {
                            let msg = format!("failed to remove the rotating file {:?}", dst);
                            return Err(with_context(e, msg));
                        }
                    }
                    fs::rename(&src, &dst).map_err(|e| {
                        let msg = format!("failed to rename the rotating file {:?} to {:?}", src, dst);
                        with_context(e, msg)
                    })?;
                }
            }
            let dst = self.backup_path(1);
            if dst.exists() {
                fs::remove_file(&dst).map_err(|e| {
                    with_context(e, format!("failed to remove the rotating file {:?}", dst))
                })?;
            }
            fs::rename(&self.path, &dst).map_err(|e| {
                let msg = format!("failed to rename the rotating file {:?} to {:?}", self.path, dst);
                with_context(e, msg)
            })?;
        }
        self.open()
    }
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "the rotating file has been closed")
}

impl LevelWriter for SizedRotatingFile {
    fn write_level(&mut self, _level: Level, data: &[u8]) -> io::Result<usize> {
        if self.is_closed() {
            return Err(closed_error());
        }
        if self.file.is_none() {
            self.open()?;
        }
        if self.nbytes.saturating_add(data.len() as u64) > self.max_size {
            self.do_rollover()?;
        }
        match self.file.as_mut() {
            Some(f) => {
                if let Err(e) = f.write_all(data) {
                    // part of the record may have reached the file
                    if let Ok(meta) = f.metadata() {
                        self.nbytes = meta.len();
                    }
                    return Err(e);
                }
                self.nbytes += data.len() as u64;
                Ok(data.len())
            }
            None => Err(io::Error::new(io::ErrorKind::NotFound, "the rotating file is not open")),
        }
    }

    /// Sync the data to the disk, nothing to do before the first write.
    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_ref() {
            Some(f) => f.sync_all(),
            None => Ok(()),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        if self.closed.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() {
            if let Some(f) = self.file.take() {
                f.sync_all()?;
            }
        }
        Ok(())
    }
}

impl Write for SizedRotatingFile {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        LevelWriter::write_level(self, Level::INFO, buf)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        LevelWriter::flush(self)
    }
}

/// Build the writer of a rotated log file.
///
/// The parent directories are created. `max_size` is parsed with [parse_size], empty means
/// `100M`. Zero `backups` disables the rotation.
///
/// # Panics
///
/// When `max_size` is malformed, or the directory can not be created.
pub fn file_writer<P: AsRef<Path>>(path: P, max_size: &str, backups: usize) -> SizedRotatingFile {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            if let Err(e) = fs::create_dir_all(dir) {
                panic!("create log dir {:?} failed: {}", dir, e);
            }
        }
    }
    let size = match max_size {
        "" => DEFAULT_MAX_SIZE,
        s => match parse_size(s) {
            Ok(size) => size,
            Err(e) => panic!("{}", e),
        },
    };
    SizedRotatingFile::new(path, size, backups)
}
