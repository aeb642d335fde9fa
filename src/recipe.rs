//! The recipe module contains some prelude functions that construct a [Builder] for
//! convenience use. Please click to the description and source for reference.

use crate::*;
use std::path::{self, PathBuf};
use std::str::FromStr;

/// Rotate the files at 100M by default.
pub const DEFAULT_FILE_SIZE: &str = "100M";

/// Keep 100 backups by default.
pub const DEFAULT_FILE_BACKUPS: usize = 100;

fn set_panic(mut config: Builder) -> Builder {
    config.panic = true;
    // panic on debugging
    #[cfg(debug_assertions)]
    {
        config.continue_when_panic = false;
    }
    // do not panic on release
    #[cfg(not(debug_assertions))]
    {
        config.continue_when_panic = true;
    }
    config
}

fn console_logger(target: ConsoleTarget, level: Level) -> Builder {
    let console_config = LogConsole::new(target, level);
    set_panic(Builder::default().console(console_config).caller("caller"))
}

/// Output to stdout with the caller field, without panic hook.
///
/// You don't care the speed when output to console.
#[inline]
pub fn stdout_logger(level: Level) -> Builder {
    console_logger(ConsoleTarget::Stdout, level).test()
}

/// Output to stderr with the caller field, without panic hook.
///
/// You don't care the speed when output to console.
#[inline]
pub fn stderr_logger(level: Level) -> Builder {
    console_logger(ConsoleTarget::Stderr, level).test()
}

fn split_path(file_path: PathBuf) -> (PathBuf, PathBuf) {
    let p = match path::absolute(&file_path) {
        Ok(p) => p,
        Err(e) => panic!("log path {:?} is not valid: {}", file_path, e),
    };
    let dir = p.parent().map(|d| d.to_path_buf()).unwrap_or_default();
    match p.file_name() {
        Some(name) => (dir, PathBuf::from(name)),
        None => panic!("log path {:?} has no file name", file_path),
    }
}

/// Setup one log file rotated by size.
///
/// `max_size` is parsed by [parse_size], zero `backups` disables the rotation.
///
/// The type of file_path can be &str / String / &OsStr / OsString / Path / PathBuf
pub fn rotated_file_logger<P: Into<PathBuf>>(
    file_path: P, level: Level, max_size: &str, backups: usize,
) -> Builder {
    let (dir, file_name) = split_path(file_path.into());
    let file = LogFile::new(dir, file_name, level).rotation(max_size, backups);
    set_panic(Builder::default().file(file))
}

/// Setup one log file, rotated at [DEFAULT_FILE_SIZE] with [DEFAULT_FILE_BACKUPS].
///
/// The type of file_path can be &str / String / &OsStr / OsString / Path / PathBuf
pub fn file_logger<P: Into<PathBuf>>(file_path: P, level: Level) -> Builder {
    rotated_file_logger(file_path, level, DEFAULT_FILE_SIZE, DEFAULT_FILE_BACKUPS)
}

/// Setup one buffered log file, rotated at [DEFAULT_FILE_SIZE] with [DEFAULT_FILE_BACKUPS].
///
/// **Flush or close the logger before exiting, or the tail is lost.**
pub fn buffered_file_logger<P: Into<PathBuf>>(file_path: P, level: Level) -> Builder {
    let (dir, file_name) = split_path(file_path.into());
    let file = LogFile::new(dir, file_name, level)
        .rotation(DEFAULT_FILE_SIZE, DEFAULT_FILE_BACKUPS)
        .buffered(0);
    set_panic(Builder::default().file(file))
}

/// Setup two log files.
/// One as "{{name}}.log" for debug purpose, with file line to track problem.
/// One as "{{name}}.log.wf" for error level log.
/// See the source for details.
///
/// The type of `dir` can be &str / String / &OsStr / OsString / Path / PathBuf.
///
/// The type of `name` can be &str / String.
pub fn split_error_file_logger<P1, P2>(dir: P1, name: P2, level: Level) -> Builder
where
    P1: Into<PathBuf>,
    P2: Into<String>,
{
    let _name: String = name.into();
    let _dir: PathBuf = dir.into();
    let debug_file = LogFile::new(_dir.clone(), format!("{}.log", _name), level);
    let error_file = LogFile::new(_dir, format!("{}.log.wf", _name), Level::ERROR);
    set_panic(Builder::default().file(debug_file).file(error_file).caller("caller"))
}

/// Configure file/console logger from environment.
///
/// # Arguments:
///
///   - file_env_name:
///
///     If valid as stdout/stderr/1/2, output to console target;
///
///     When a file path is configured, create a file_logger();
///
///     For empty string, default output to Stderr.
///
///   - level_env_name: configure the log level, default to Info.
///
/// # Example:
///
/// ``` rust
/// use levelog::recipe;
/// let _logger = recipe::env_logger("LOG_FILE", "LOG_LEVEL").build();
/// ```
pub fn env_logger(file_env_name: &str, level_env_name: &str) -> Builder {
    let level: Level = env_or(level_env_name, Level::INFO).into();
    let mut console: Option<ConsoleTarget> = None;
    if let Ok(file_path) = std::env::var(file_env_name) {
        if let Ok(target) = ConsoleTarget::from_str(file_path.as_str()) {
            console = Some(target);
        } else if !file_path.is_empty() {
            return file_logger(file_path, level).test();
        }
    }
    console_logger(console.unwrap_or(ConsoleTarget::Stderr), level).test()
}
