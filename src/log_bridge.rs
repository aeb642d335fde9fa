//! Route the records of the [log] crate macros into a [Logger].
//!
//! ``` rust
//! use levelog::{DiscardWriter, LogBridge, Logger};
//! let logger = Logger::new("app").with_writer(DiscardWriter);
//! let _ = LogBridge::install(logger);
//! log::info!(user = 3; "login");
//! ```

use crate::emitter::Emitter;
use crate::global::default_logger;
use crate::hook::CallSite;
use crate::level::Level;
use crate::logger::Logger;
use crate::value::Value;
use log::kv::{self, VisitSource};
use std::borrow::Cow;
use std::sync::Arc;

pub struct LogBridge {
    // None follows the default logger, even after it is replaced.
    logger: Option<Logger>,
}

impl LogBridge {
    pub fn new(logger: Logger) -> Self {
        Self { logger: Some(logger) }
    }

    /// Forward to [default_logger], looked up on each record.
    pub fn to_default() -> Self {
        Self { logger: None }
    }

    /// Set as the global logger of the `log` crate.
    ///
    /// The max level of `log` is raised to trace, the gate of the logger decides instead.
    pub fn install(logger: Logger) -> Result<(), log::SetLoggerError> {
        Self::new(logger).set_global()
    }

    /// Same as [LogBridge::install] with [LogBridge::to_default].
    pub fn install_default() -> Result<(), log::SetLoggerError> {
        Self::to_default().set_global()
    }

    fn set_global(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }

    fn with_logger<R>(&self, f: impl FnOnce(&Logger) -> R) -> R {
        match self.logger.as_ref() {
            Some(logger) => f(logger),
            None => {
                let logger: Arc<Logger> = default_logger();
                f(&logger)
            }
        }
    }
}

struct KvVisitor<'e, 'l> {
    e: &'e mut Emitter<'l>,
}

impl<'kvs> VisitSource<'kvs> for KvVisitor<'_, '_> {
    fn visit_pair(&mut self, key: kv::Key<'kvs>, value: kv::Value<'kvs>) -> Result<(), kv::Error> {
        self.e.add_value(key.as_str(), &convert_kv(&value));
        Ok(())
    }
}

fn convert_kv<'v>(v: &kv::Value<'v>) -> Value<'v> {
    if let Some(b) = v.to_bool() {
        Value::Bool(b)
    } else if let Some(i) = v.to_i64() {
        Value::Int(i)
    } else if let Some(u) = v.to_u64() {
        Value::Uint(u)
    } else if let Some(f) = v.to_f64() {
        Value::F64(f)
    } else if let Some(s) = v.to_borrowed_str() {
        Value::Str(Cow::Borrowed(s))
    } else {
        Value::Str(Cow::Owned(v.to_string()))
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.with_logger(|logger| logger.enabled(Level::from(metadata.level())))
    }

    fn log(&self, record: &log::Record) {
        self.with_logger(|logger| forward(logger, record))
    }

    fn flush(&self) {
        if let Err(e) = self.with_logger(|logger| logger.flush()) {
            eprintln!("levelog: flush failed: {}", e);
        }
    }
}

fn forward(logger: &Logger, record: &log::Record) {
    let mut e = logger.emitter(Level::from(record.level()));
    if !e.enabled() {
        return;
    }
    if let (Some(file), Some(line)) = (record.file_static(), record.line()) {
        e = e.at(CallSite { file, line, module: record.module_path_static() });
    } else if let Some(module) = record.module_path_static() {
        e = e.module(module);
    }
    let _ = record.key_values().visit(&mut KvVisitor { e: &mut e });
    if let Err(err) = e.printf(*record.args()) {
        eprintln!("levelog: failed to write a log record: {}", err);
    }
}
