//! # levelog
//!
//! A structured, leveled logger encoding each record as one JSON object.
//!
//! - Loggers are cheap to derive: a child shares the encoder, the writers and the inherited
//!   fields of its parent, and follows the level of its parent until it sets its own.
//!
//! - The gate decides before anything is encoded: the global level override, the level of the
//!   logger, then the sampler by logger name.
//!
//! - The inherited fields are encoded once, when they are added to the logger.
//!
//! - Writers receive the level of each record, so they can route, filter or split by level.
//!   [SizedRotatingFile] keeps a log file under a size limit with numbered backups.
//!
//! ## Usage
//!
//! ``` rust
//! use levelog::*;
//!
//! let logger = Logger::new("app")
//!     .with_writer(DiscardWriter)
//!     .with_ctx("pid", std::process::id());
//! logger.set_level(Level::INFO);
//!
//! let db = logger.child("db");
//! let _ = db.info().kv("pool", 8).kv("timeout", std::time::Duration::from_secs(3)).print("connected");
//! log_warn!(db, { "conn" => 7 }, "slow query took {}ms", 250);
//! ```
//!
//! With the recipes, setting up the default logger used by the macros without logger, and by
//! the `log` crate macros:
//!
//! ``` rust
//! use levelog::*;
//! let _logger = recipe::stderr_logger(Level::DEBUG).setup();
//! log_info!("started");
//! log::info!("from the log crate");
//! ```

extern crate log;

mod config;
mod emitter;
mod encoder;
mod env;
mod escape;
mod field;
mod global;
mod hook;
mod level;
mod log_bridge;
mod logger;
mod parser;
mod pool;
mod sampler;
mod value;
mod writer;

pub mod macros;
pub mod recipe;

pub use self::{
    config::{log_panic, Builder, LogConsole, LogFile},
    emitter::Emitter,
    encoder::{append_duration, Encoder, JsonEncoder, TimeFormat},
    env::{env_or, EnvVarDefault},
    escape::{append_json_bytes, append_json_str},
    field::{field, Field, FieldValue, LazyValue},
    global::{
        default_logger, global_disable_sampling, global_level, set_default_logger,
        set_global_level, unset_global_level, GlobalState,
    },
    hook::{call_stack, format_caller, CallSite, Caller, CallerStack, Hook},
    level::{format_level, parse_level, parse_level_or, Level, ParseLevelError},
    log_bridge::LogBridge,
    logger::{Logger, SharedWriter},
    parser::{JsonRecord, LogParser, LogParserLineIter},
    pool::{global_pool, BufferPool, PooledBuffer, DEFAULT_BUFFER_CAP, MAX_POOLED_CAP},
    sampler::{Sampler, SimpleSampler, SwitchSampler},
    value::{EncodeJson, Json, Loggable, MarshalJson, Value, WriteJson},
    writer::*,
};

#[cfg(test)]
mod tests;
