use crate::level::Level;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Decide whether a record passing the level threshold is emitted.
///
/// Samplers are consulted on every enabled call, keep them cheap.
pub trait Sampler: Send + Sync {
    fn sample(&self, name: &str, level: Level) -> bool;
}

impl<F> Sampler for F
where
    F: Fn(&str, Level) -> bool + Send + Sync,
{
    #[inline(always)]
    fn sample(&self, name: &str, level: Level) -> bool {
        self(name, level)
    }
}

#[inline(always)]
fn allow_level(level: Level, threshold: Level) -> bool {
    if threshold.is_disabled() {
        return false;
    }
    level >= threshold
}

/// Per logger name thresholds, with a default one for the other names.
///
/// A pattern ending with `*` matches the names starting with the part before it, e.g.
/// `"app.db.*"` matches `"app.db.pool"` but not `"app.db"`. Other patterns match the exact name.
///
/// When several patterns match a name, the one registered first wins. Register
/// non-overlapping patterns to keep the result independent of the order.
///
/// The patterns are read from a published snapshot, updates never block [Sampler::sample].
///
/// ``` rust
/// use levelog::{Level, SimpleSampler, Sampler};
/// let sampler = SimpleSampler::new(Level::INFO);
/// sampler.add_named_level("app.db.*", Level::WARN);
/// assert!(sampler.sample("app", Level::INFO));
/// assert!(!sampler.sample("app.db.pool", Level::INFO));
/// ```
pub struct SimpleSampler {
    level: AtomicU8,
    names: Mutex<Vec<(String, Level)>>,
    snapshot: ArcSwap<Vec<(String, Level)>>,
}

impl SimpleSampler {
    pub fn new(default_level: Level) -> Self {
        Self {
            level: AtomicU8::new(default_level.value()),
            names: Mutex::new(Vec::new()),
            snapshot: ArcSwap::from_pointee(Vec::new()),
        }
    }

    #[inline]
    pub fn default_level(&self) -> Level {
        Level::new(self.level.load(Ordering::Acquire))
    }

    pub fn set_default_level(&self, level: Level) {
        self.level.store(level.value(), Ordering::Release);
    }

    /// A copy of the registered patterns.
    pub fn named_levels(&self) -> BTreeMap<String, Level> {
        self.names.lock().iter().cloned().collect()
    }

    /// Replace all the patterns, registered in the order of the iterator.
    pub fn reset_named_levels<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = (S, Level)>,
        S: Into<String>,
    {
        let mut guard = self.names.lock();
        guard.clear();
        for (name, level) in names {
            let name = name.into();
            if !guard.iter().any(|(n, _)| *n == name) {
                guard.push((name, level));
            }
        }
        self.snapshot.store(Arc::new(guard.clone()));
    }

    /// Register a pattern. An already registered pattern keeps its level.
    pub fn add_named_level(&self, name: &str, level: Level) {
        let mut guard = self.names.lock();
        if guard.iter().any(|(n, _)| n == name) {
            return;
        }
        guard.push((name.to_string(), level));
        self.snapshot.store(Arc::new(guard.clone()));
    }

    pub fn del_name(&self, name: &str) {
        let mut guard = self.names.lock();
        let len = guard.len();
        guard.retain(|(n, _)| n != name);
        if guard.len() != len {
            self.snapshot.store(Arc::new(guard.clone()));
        }
    }
}

impl Sampler for SimpleSampler {
    fn sample(&self, name: &str, level: Level) -> bool {
        let names = self.snapshot.load();
        for (pattern, threshold) in names.iter() {
            let matched = match pattern.strip_suffix('*') {
                Some(prefix) => name.starts_with(prefix),
                None => pattern == name,
            };
            if matched {
                return allow_level(level, *threshold);
            }
        }
        allow_level(level, self.default_level())
    }
}

/// A sampler forwarding to another one, which can be replaced at any time.
pub struct SwitchSampler {
    inner: ArcSwap<Arc<dyn Sampler>>,
}

impl SwitchSampler {
    pub fn new(sampler: Arc<dyn Sampler>) -> Self {
        Self { inner: ArcSwap::from_pointee(sampler) }
    }

    pub fn get(&self) -> Arc<dyn Sampler> {
        self.inner.load().as_ref().clone()
    }

    pub fn set(&self, sampler: Arc<dyn Sampler>) {
        self.inner.store(Arc::new(sampler));
    }
}

impl Sampler for SwitchSampler {
    #[inline]
    fn sample(&self, name: &str, level: Level) -> bool {
        self.inner.load().sample(name, level)
    }
}
