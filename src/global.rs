//! Process-wide switches and the default logger.
//!
//! The switches live in a [GlobalState] which every [Logger] holds a reference to. The process
//! has one shared instance, tests can hand their own instance to a logger with
//! [Logger::with_global_state].

use crate::level::Level;
use crate::logger::Logger;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicBool, AtomicI16, Ordering};
use std::sync::{Arc, OnceLock};

const LEVEL_UNSET: i16 = -1;

/// The global level override and the global sampling switch.
#[derive(Debug)]
pub struct GlobalState {
    level: AtomicI16,
    sampling: AtomicBool,
}

impl Default for GlobalState {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalState {
    pub const fn new() -> Self {
        Self { level: AtomicI16::new(LEVEL_UNSET), sampling: AtomicBool::new(true) }
    }

    /// The state shared by the whole process.
    pub fn shared() -> Arc<GlobalState> {
        static SHARED: OnceLock<Arc<GlobalState>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(GlobalState::new())).clone()
    }

    /// Override the threshold of every logger bound to this state.
    #[inline]
    pub fn set_level(&self, level: Level) {
        self.level.store(level.value() as i16, Ordering::Release);
    }

    #[inline]
    pub fn unset_level(&self) {
        self.level.store(LEVEL_UNSET, Ordering::Release);
    }

    #[inline]
    pub fn level(&self) -> Option<Level> {
        let v = self.level.load(Ordering::Acquire);
        if v < 0 {
            None
        } else {
            Level::try_new(v as u8)
        }
    }

    /// When disabled, samplers are bypassed and only the level threshold applies.
    #[inline]
    pub fn disable_sampling(&self, disable: bool) {
        self.sampling.store(!disable, Ordering::Release);
    }

    #[inline]
    pub fn sampling_enabled(&self) -> bool {
        self.sampling.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.unset_level();
        self.disable_sampling(false);
    }
}

/// Set the global level, overriding the level of every logger in the process.
pub fn set_global_level(level: Level) {
    GlobalState::shared().set_level(level);
}

pub fn unset_global_level() {
    GlobalState::shared().unset_level();
}

pub fn global_level() -> Option<Level> {
    GlobalState::shared().level()
}

/// Turn off or on all the samplers of the process.
pub fn global_disable_sampling(disable: bool) {
    GlobalState::shared().disable_sampling(disable);
}

static DEFAULT_LOGGER: OnceLock<ArcSwap<Logger>> = OnceLock::new();

/// The process default logger, a root logger writing to stderr unless replaced.
pub fn default_logger() -> Arc<Logger> {
    DEFAULT_LOGGER.get_or_init(|| ArcSwap::from_pointee(Logger::root())).load_full()
}

/// Replace the process default logger, used by the logging macros without an explicit logger.
pub fn set_default_logger(logger: Logger) {
    let logger = Arc::new(logger);
    let cell = DEFAULT_LOGGER.get_or_init(|| ArcSwap::new(logger.clone()));
    cell.store(logger);
}
