use crate::emitter::Emitter;
use crate::encoder::{Encoder, JsonEncoder};
use crate::field::{Context, CtxValue, Field};
use crate::global::GlobalState;
use crate::hook::{CallSite, Hook};
use crate::level::Level;
use crate::sampler::Sampler;
use crate::value::Value;
use crate::writer::{ConsoleWriter, LevelWriter, MutexWriter, Sink};
use std::borrow::Cow;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicI16, Ordering};
use std::sync::Arc;

const LEVEL_UNSET: i16 = -1;

/// The writer chain shared by a logger and the loggers derived from it.
pub type SharedWriter = Arc<MutexWriter<Box<dyn LevelWriter>>>;

/// The level of a logger, falling back to the one it was derived from while unset.
///
/// Only the child holds a reference to its parent, so dropping a child never affects the
/// parent.
struct LevelNode {
    level: AtomicI16,
    parent: Option<Arc<LevelNode>>,
}

impl LevelNode {
    fn resolve(&self) -> Level {
        let mut node = self;
        loop {
            let v = node.level.load(Ordering::Acquire);
            if v >= 0 {
                return Level::new(v as u8);
            }
            match node.parent.as_deref() {
                Some(parent) => node = parent,
                // A root level can not be unset
                None => return Level::DEBUG,
            }
        }
    }
}

/// A named logger.
///
/// Loggers are cheap to clone and derive: the encoder, the writer chain and the inherited
/// fields are shared. Each `with_*` and [Logger::child] call returns a new logger whose level
/// follows the level of the logger it was derived from, until it is set on the new logger
/// itself.
///
/// ``` rust
/// use levelog::{Level, Logger, DiscardWriter};
/// let root = Logger::new("app").with_writer(DiscardWriter);
/// let db = root.child("db").with_ctx("pool", 3);
/// root.set_level(Level::WARN);
/// assert!(!db.enabled(Level::INFO));
/// let _ = db.warn().kv("conn", 10).print("pool exhausted");
/// ```
#[derive(Clone)]
pub struct Logger {
    name: Arc<str>,
    level: Arc<LevelNode>,
    sampler: Option<Arc<dyn Sampler>>,
    pub(crate) encoder: Arc<dyn Encoder>,
    pub(crate) writer: SharedWriter,
    pub(crate) hooks: Arc<Vec<Arc<dyn Hook>>>,
    pub(crate) ctx: Arc<Context>,
    depth: usize,
    exit_code: i32,
    global: Arc<GlobalState>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("depth", &self.depth)
            .finish()
    }
}

impl Logger {
    /// A root logger at [Level::DEBUG], encoding JSON to stderr.
    pub fn new(name: &str) -> Self {
        let writer: Box<dyn LevelWriter> = Box::new(Sink::from(ConsoleWriter::stderr()));
        Self {
            name: Arc::from(name),
            level: Arc::new(LevelNode {
                level: AtomicI16::new(Level::DEBUG.value() as i16),
                parent: None,
            }),
            sampler: None,
            encoder: Arc::new(JsonEncoder::default()),
            writer: Arc::new(MutexWriter::new(writer)),
            hooks: Arc::new(Vec::new()),
            ctx: Arc::new(Context::default()),
            depth: 0,
            exit_code: exitcode::SOFTWARE,
            global: GlobalState::shared(),
        }
    }

    /// A root logger without name.
    pub fn root() -> Self {
        Self::new("")
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    #[inline]
    pub fn sampler(&self) -> Option<&Arc<dyn Sampler>> {
        self.sampler.as_ref()
    }

    #[inline]
    pub fn encoder(&self) -> &Arc<dyn Encoder> {
        &self.encoder
    }

    #[inline]
    pub fn writer(&self) -> &SharedWriter {
        &self.writer
    }

    #[inline]
    pub fn global_state(&self) -> &Arc<GlobalState> {
        &self.global
    }

    /// The level of this logger, or the inherited one when it is unset.
    #[inline]
    pub fn level(&self) -> Level {
        self.level.resolve()
    }

    pub fn set_level(&self, level: Level) {
        self.level.level.store(level.value() as i16, Ordering::Release);
    }

    /// Follow the level of the parent logger again.
    ///
    /// # Panics
    ///
    /// On a root logger, which has nothing to inherit from.
    pub fn unset_level(&self) {
        if self.level.parent.is_none() {
            panic!("the logger named '{}' has no parent logger", self.name);
        }
        self.level.level.store(LEVEL_UNSET, Ordering::Release);
    }

    /// Whether a record at `level` passes the gate.
    ///
    /// The global level, when set, replaces the level of the logger. A record passing the
    /// threshold is then submitted to the sampler, unless sampling is disabled globally.
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        if level.is_disabled() {
            return false;
        }
        let threshold = match self.global.level() {
            Some(global) => global,
            None => self.level(),
        };
        if level < threshold {
            return false;
        }
        if let Some(sampler) = self.sampler.as_ref() {
            if self.global.sampling_enabled() {
                return sampler.sample(&self.name, level);
            }
        }
        true
    }

    /// A copy following the level of `self`.
    fn derive(&self) -> Self {
        let mut l = self.clone();
        l.level = Arc::new(LevelNode {
            level: AtomicI16::new(LEVEL_UNSET),
            parent: Some(self.level.clone()),
        });
        l
    }

    /// A child logger named `parent.name`, or just `name` when the parent has no name.
    pub fn child(&self, name: &str) -> Self {
        let mut l = self.derive();
        if self.name.is_empty() {
            l.name = Arc::from(name);
        } else if !name.is_empty() {
            l.name = Arc::from(format!("{}.{}", self.name, name));
        }
        l
    }

    /// A derived logger with another name.
    pub fn with_name(&self, name: &str) -> Self {
        let mut l = self.derive();
        l.name = Arc::from(name);
        l
    }

    pub fn with_level(&self, level: Level) -> Self {
        let l = self.derive();
        l.set_level(level);
        l
    }

    pub fn with_sampler<S: Sampler + 'static>(&self, sampler: S) -> Self {
        self.with_shared_sampler(Arc::new(sampler))
    }

    pub fn with_shared_sampler(&self, sampler: Arc<dyn Sampler>) -> Self {
        let mut l = self.derive();
        l.sampler = Some(sampler);
        l
    }

    pub fn without_sampler(&self) -> Self {
        let mut l = self.derive();
        l.sampler = None;
        l
    }

    /// Change the encoder, the inherited fields are encoded again with it.
    pub fn with_encoder<E: Encoder + 'static>(&self, encoder: E) -> Self {
        let mut l = self.derive();
        l.encoder = Arc::new(encoder);
        l.ctx = Arc::new(self.ctx.reencode(l.encoder.as_ref()));
        l
    }

    pub fn with_writer<W: LevelWriter + 'static>(&self, writer: W) -> Self {
        let writer: Box<dyn LevelWriter> = Box::new(writer);
        self.with_shared_writer(Arc::new(MutexWriter::new(writer)))
    }

    /// Use a writer chain shared with other loggers.
    pub fn with_shared_writer(&self, writer: SharedWriter) -> Self {
        let mut l = self.derive();
        l.writer = writer;
        l
    }

    /// Replace the hooks.
    pub fn with_hooks(&self, hooks: Vec<Arc<dyn Hook>>) -> Self {
        let mut l = self.derive();
        l.hooks = Arc::new(hooks);
        l
    }

    pub fn add_hook<H: Hook + 'static>(&self, hook: H) -> Self {
        let mut l = self.derive();
        let mut hooks = self.hooks.as_ref().clone();
        hooks.push(Arc::new(hook));
        l.hooks = Arc::new(hooks);
        l
    }

    /// Add a field inherited by every record, encoded once now.
    pub fn with_ctx<'a>(&self, key: &str, value: impl Into<Value<'a>>) -> Self {
        self.push_ctx(key, CtxValue::Value(value.into().into_owned()))
    }

    /// Add a field inherited by every record, whose value is computed for each emitted record.
    pub fn with_lazy_ctx<F>(&self, key: &str, f: F) -> Self
    where
        F: Fn() -> Value<'static> + Send + Sync + 'static,
    {
        self.push_ctx(key, CtxValue::Lazy(Arc::new(f)))
    }

    /// Add several fields. Lazy fields are resolved once, now.
    pub fn with_fields(&self, fields: &[Field]) -> Self {
        let mut l = self.derive();
        let mut ctx = self.ctx.as_ref().clone();
        for f in fields {
            let value = f.resolve().into_owned().into_owned();
            ctx.push(l.encoder.as_ref(), Cow::Owned(f.key.to_string()), CtxValue::Value(value));
        }
        l.ctx = Arc::new(ctx);
        l
    }

    fn push_ctx(&self, key: &str, value: CtxValue) -> Self {
        let mut l = self.derive();
        let mut ctx = self.ctx.as_ref().clone();
        ctx.push(l.encoder.as_ref(), Cow::Owned(key.to_string()), value);
        l.ctx = Arc::new(ctx);
        l
    }

    /// Drop the inherited fields.
    pub fn reset_ctx(&self) -> Self {
        let mut l = self.derive();
        l.ctx = Arc::new(Context::default());
        l
    }

    /// Skip `depth` more stack frames when locating the caller.
    pub fn with_depth(&self, depth: usize) -> Self {
        let mut l = self.derive();
        l.depth += depth;
        l
    }

    /// The exit code of the process after a [Level::FATAL] record.
    pub fn with_exit_code(&self, code: i32) -> Self {
        let mut l = self.derive();
        l.exit_code = code;
        l
    }

    /// Bind the logger to another global level and sampling switch.
    pub fn with_global_state(&self, global: Arc<GlobalState>) -> Self {
        let mut l = self.derive();
        l.global = global;
        l
    }

    /// Start a record at `level`. A record failing the gate gives an inert emitter.
    #[track_caller]
    #[inline]
    pub fn emitter(&self, level: Level) -> Emitter<'_> {
        if !self.enabled(level) {
            return Emitter::disabled();
        }
        Emitter::new(self, level, CallSite::caller())
    }

    #[track_caller]
    #[inline]
    pub fn trace(&self) -> Emitter<'_> {
        self.emitter(Level::TRACE)
    }

    #[track_caller]
    #[inline]
    pub fn debug(&self) -> Emitter<'_> {
        self.emitter(Level::DEBUG)
    }

    #[track_caller]
    #[inline]
    pub fn info(&self) -> Emitter<'_> {
        self.emitter(Level::INFO)
    }

    #[track_caller]
    #[inline]
    pub fn warn(&self) -> Emitter<'_> {
        self.emitter(Level::WARN)
    }

    #[track_caller]
    #[inline]
    pub fn error(&self) -> Emitter<'_> {
        self.emitter(Level::ERROR)
    }

    #[track_caller]
    #[inline]
    pub fn alert(&self) -> Emitter<'_> {
        self.emitter(Level::ALERT)
    }

    /// The record panics with its message after being written.
    #[track_caller]
    #[inline]
    pub fn panic(&self) -> Emitter<'_> {
        self.emitter(Level::PANIC)
    }

    /// The process exits with [Logger::exit_code] after the record is written.
    #[track_caller]
    #[inline]
    pub fn fatal(&self) -> Emitter<'_> {
        self.emitter(Level::FATAL)
    }

    /// Emit a record with the fields. Lazy fields are only evaluated when the record passes
    /// the gate.
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, fields: &[Field]) -> io::Result<()> {
        let mut e = self.emitter(level);
        if !e.enabled() {
            return Ok(());
        }
        for f in fields {
            e.add_value(&f.key, &f.resolve());
        }
        e.print(msg)
    }

    /// Emit a record with an alternating list of keys and values.
    ///
    /// # Panics
    ///
    /// When the list has an odd length, or a key is not a string.
    #[track_caller]
    pub fn logs(&self, level: Level, msg: &str, kvs: &[Value]) -> io::Result<()> {
        if kvs.len() % 2 != 0 {
            panic!("the length of the key-value log contexts is not even");
        }
        self.emitter(level).kvs(kvs).print(msg)
    }

    pub fn flush(&self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Close the writer chain, shared with every logger using it.
    pub fn close(&self) -> io::Result<()> {
        self.writer.close()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::root()
    }
}
