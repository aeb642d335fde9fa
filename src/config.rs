use crate::encoder::JsonEncoder;
use crate::global::{default_logger, set_default_logger, GlobalState};
use crate::hook::{call_stack, Caller, CallerStack};
use crate::level::Level;
use crate::log_bridge::LogBridge;
use crate::logger::Logger;
use crate::sampler::Sampler;
use crate::writer::{
    parse_size, BufferedWriter, ConsoleTarget, ConsoleWriter, DiscardWriter, LevelFilterWriter,
    LevelWriter, MultiWriter, SizedRotatingFile, DEFAULT_MAX_SIZE,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Config to build a [Logger].
/// See crate::recipe for usage
pub struct Builder {
    /// Name of the root logger
    pub name: String,

    /// The level of the logger, defaults to the lowest level of the sinks
    pub level: Option<Level>,

    /// Hookup to log error when panic, only applies to [Builder::setup]
    pub panic: bool,

    /// Whether to exit program after panic
    pub continue_when_panic: bool,

    /// Route the records of the `log` crate macros, only applies to [Builder::setup]
    pub log_bridge: bool,

    /// The key of the `file:line` caller field, none to disable
    pub caller: Option<&'static str>,

    /// The key of the call stack field, none to disable
    pub stack: Option<&'static str>,

    pub encoder: JsonEncoder,

    pub sampler: Option<Arc<dyn Sampler>>,

    pub global: Option<Arc<GlobalState>>,

    /// Different types of log sink
    pub(crate) sinks: Vec<Box<dyn SinkConfigTrait>>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            name: String::new(),
            level: None,
            panic: false,
            continue_when_panic: false,
            log_bridge: true,
            caller: None,
            stack: None,
            encoder: JsonEncoder::default(),
            sampler: None,
            global: None,
            sinks: Vec::new(),
        }
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// For test cases, turn off the panic hook.
    /// Call this with pre-set recipe for convenient.
    pub fn test(mut self) -> Self {
        self.panic = false;
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Add rotated file sink
    pub fn file(mut self, config: LogFile) -> Self {
        self.sinks.push(Box::new(config));
        self
    }

    /// Add console sink
    pub fn console(mut self, config: LogConsole) -> Self {
        self.sinks.push(Box::new(config));
        self
    }

    pub fn encoder(mut self, encoder: JsonEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn sampler<S: Sampler + 'static>(mut self, sampler: S) -> Self {
        self.sampler = Some(Arc::new(sampler));
        self
    }

    pub fn caller(mut self, key: &'static str) -> Self {
        self.caller = Some(key);
        self
    }

    pub fn stack(mut self, key: &'static str) -> Self {
        self.stack = Some(key);
        self
    }

    /// Bind the logger to another global state than the process-wide one.
    pub fn global(mut self, global: Arc<GlobalState>) -> Self {
        self.global = Some(global);
        self
    }

    /// Return the lowest log level in the log sinks
    pub fn get_min_level(&self) -> Level {
        let mut min_level = Level::DISABLED;
        for sink in &self.sinks {
            let level = sink.get_level();
            if level < min_level {
                min_level = level;
            }
        }
        min_level
    }

    /// The paths of the file sinks.
    pub fn file_paths(&self) -> Vec<&Path> {
        self.sinks.iter().filter_map(|s| s.get_file_path()).collect()
    }

    /// The writer chain of the sinks, records under the level of a sink are filtered out.
    pub fn build_writer(&self) -> Box<dyn LevelWriter> {
        let mut writers: Vec<Box<dyn LevelWriter>> = Vec::with_capacity(self.sinks.len());
        for sink in &self.sinks {
            writers.push(Box::new(LevelFilterWriter::new(sink.get_level(), sink.build())));
        }
        match writers.len() {
            0 => Box::new(DiscardWriter),
            1 => writers.remove(0),
            _ => {
                let mut multi = MultiWriter::new();
                for w in writers {
                    multi.push(w);
                }
                Box::new(multi)
            }
        }
    }

    /// Build the root logger.
    pub fn build(&self) -> Logger {
        let mut logger = Logger::new(&self.name)
            .with_encoder(self.encoder.clone())
            .with_writer(self.build_writer());
        if let Some(global) = self.global.as_ref() {
            logger = logger.with_global_state(global.clone());
        }
        if let Some(sampler) = self.sampler.as_ref() {
            logger = logger.with_shared_sampler(sampler.clone());
        }
        if let Some(key) = self.caller {
            logger = logger.add_hook(Caller::new(key));
        }
        if let Some(key) = self.stack {
            logger = logger.add_hook(CallerStack::new(key));
        }
        logger.set_level(self.level.unwrap_or_else(|| self.get_min_level()));
        logger
    }

    /// Build the logger and set it as the default logger, used by the macros without logger.
    ///
    /// The panic hook and the `log` crate bridge are installed as configured. The bridge
    /// follows the default logger, so calling this again only replaces the logger.
    pub fn setup(self) -> Logger {
        let logger = self.build();
        set_default_logger(logger.clone());
        if self.log_bridge {
            // Fails when a `log` backend is already set, maybe by a previous setup.
            let _ = LogBridge::install_default();
        }
        if self.panic {
            if self.continue_when_panic {
                std::panic::set_hook(Box::new(panic_no_exit_hook));
            } else {
                std::panic::set_hook(Box::new(panic_and_exit_hook));
            }
        }
        logger
    }
}

/// log handle for panic hook
#[doc(hidden)]
pub fn log_panic(info: &std::panic::PanicHookInfo) {
    let logger = default_logger();
    let mut e = logger.error();
    if let Some(loc) = info.location() {
        e = e.kv("caller", format!("{}:{}", loc.file(), loc.line()));
    }
    let stack = call_stack(0);
    let _ = e.kv("stack", stack.as_slice()).printf(format_args!("panic occur: {}", info));
    let _ = logger.flush();
    eprintln!("panic occur: {}\ntrace: {:?}", info, stack);
}

fn panic_and_exit_hook(info: &std::panic::PanicHookInfo) {
    log_panic(info);
    std::process::exit(default_logger().exit_code());
}

fn panic_no_exit_hook(info: &std::panic::PanicHookInfo) {
    log_panic(info);
    eprintln!("not debug version, so don't exit process");
}

pub(crate) trait SinkConfigTrait: Send + Sync {
    /// get the lowest log level of the sink
    fn get_level(&self) -> Level;
    /// Only file sink has path
    fn get_file_path(&self) -> Option<&Path>;
    /// Build an actual writer from config
    fn build(&self) -> Box<dyn LevelWriter>;
}

/// Config for a file sink rotated by size.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct LogFile {
    /// lowest log level in this file
    pub level: Level,

    /// path: dir/name
    pub file_path: PathBuf,

    /// Rotate before the file exceeds it
    pub max_size: u64,

    /// Number of backups, 0 disables the rotation
    pub backups: usize,

    /// Merge the writes in memory up to this size, none to write through
    pub flush_size: Option<usize>,
}

impl LogFile {
    /// Construct config for file sink,
    /// will try to create dir if not exists.
    ///
    /// The type of `dir` and `file_name` can be &str / String / &OsStr / OsString / Path / PathBuf. They can be of
    /// different types.
    ///
    /// The file is rotated at 100M, keeping 100 backups.
    pub fn new<P1, P2>(dir: P1, file_name: P2, level: Level) -> Self
    where
        P1: Into<PathBuf>,
        P2: Into<PathBuf>,
    {
        let dir_path: PathBuf = dir.into();
        if !dir_path.exists() {
            if let Err(e) = std::fs::create_dir_all(&dir_path) {
                panic!("create log dir {:?} failed: {}", dir_path, e);
            }
        }
        let file_path = dir_path.join(file_name.into());
        Self { level, file_path, max_size: DEFAULT_MAX_SIZE, backups: 100, flush_size: None }
    }

    /// `max_size` is parsed by [parse_size], empty means 100M.
    ///
    /// # Panics
    ///
    /// When `max_size` is malformed.
    pub fn rotation(mut self, max_size: &str, backups: usize) -> Self {
        self.max_size = match parse_size(max_size) {
            Ok(0) => DEFAULT_MAX_SIZE,
            Ok(size) => size,
            Err(e) => panic!("{}", e),
        };
        self.backups = backups;
        self
    }

    /// Buffer the writes, a zero size means the default.
    ///
    /// **Flush or close the logger before exiting, or the tail is lost.**
    pub fn buffered(mut self, flush_size: usize) -> Self {
        self.flush_size = Some(flush_size);
        self
    }
}

impl SinkConfigTrait for LogFile {
    fn get_level(&self) -> Level {
        self.level
    }

    fn get_file_path(&self) -> Option<&Path> {
        Some(&self.file_path)
    }

    fn build(&self) -> Box<dyn LevelWriter> {
        let file = SizedRotatingFile::new(self.file_path.clone(), self.max_size, self.backups);
        match self.flush_size {
            Some(size) => Box::new(BufferedWriter::with_flush_size(file, size)),
            None => Box::new(file),
        }
    }
}

/// Config for a console sink.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct LogConsole {
    pub target: ConsoleTarget,

    /// lowest log level on the console
    pub level: Level,
}

impl LogConsole {
    pub fn new(target: ConsoleTarget, level: Level) -> Self {
        Self { target, level }
    }
}

impl SinkConfigTrait for LogConsole {
    fn get_level(&self) -> Level {
        self.level
    }

    fn get_file_path(&self) -> Option<&Path> {
        None
    }

    fn build(&self) -> Box<dyn LevelWriter> {
        Box::new(ConsoleWriter::new(self.target))
    }
}
