use crate::field::Field;
use crate::hook::CallSite;
use crate::level::Level;
use crate::logger::Logger;
use crate::pool::{global_pool, PooledBuffer};
use crate::value::Value;
use std::error::Error;
use std::fmt;
use std::io;

struct Pending<'l> {
    logger: &'l Logger,
    level: Level,
    buf: PooledBuffer<'static>,
    site: CallSite,
}

/// A record under construction.
///
/// The fields are encoded as soon as they are added. The record is written by
/// [Emitter::print] or [Emitter::printf], dropping the emitter discards it.
///
/// An emitter for a record failing the gate is inert: every method is a no-op, and nothing
/// passed to it is evaluated lazily.
pub struct Emitter<'l> {
    inner: Option<Pending<'l>>,
}

impl<'l> Emitter<'l> {
    pub(crate) fn new(logger: &'l Logger, level: Level, site: CallSite) -> Self {
        let mut buf = global_pool().acquire();
        logger.encoder.start(&mut buf, logger.name(), level);
        logger.ctx.write_to(logger.encoder.as_ref(), &mut buf);
        Self { inner: Some(Pending { logger, level, buf, site }) }
    }

    #[inline(always)]
    pub(crate) fn disabled() -> Self {
        Self { inner: None }
    }

    /// Whether the record will be written.
    #[inline(always)]
    pub fn enabled(&self) -> bool {
        self.inner.is_some()
    }

    #[inline]
    pub fn level(&self) -> Option<Level> {
        self.inner.as_ref().map(|p| p.level)
    }

    #[inline]
    pub fn call_site(&self) -> Option<&CallSite> {
        self.inner.as_ref().map(|p| &p.site)
    }

    /// The extra stack depth of the logger.
    #[inline]
    pub fn depth(&self) -> usize {
        self.inner.as_ref().map(|p| p.logger.depth()).unwrap_or(0)
    }

    /// Add a field in place, for hooks.
    #[inline]
    pub fn add<'v>(&mut self, key: &str, value: impl Into<Value<'v>>) {
        if self.inner.is_some() {
            self.add_value(key, &value.into());
        }
    }

    pub fn add_value(&mut self, key: &str, value: &Value) {
        if let Some(p) = self.inner.as_mut() {
            p.logger.encoder.encode(&mut p.buf, key, value);
        }
    }

    #[inline]
    pub fn kv<'v>(mut self, key: &str, value: impl Into<Value<'v>>) -> Self {
        self.add(key, value);
        self
    }

    /// `f` is only called when the record is enabled.
    #[inline]
    pub fn kv_lazy<'v, F>(mut self, key: &str, f: F) -> Self
    where
        F: FnOnce() -> Value<'v>,
    {
        if self.inner.is_some() {
            self.add_value(key, &f());
        }
        self
    }

    /// Shorthand of `kv("err", ..)`.
    #[inline]
    pub fn err(mut self, e: &(dyn Error + Sync)) -> Self {
        self.add_value("err", &Value::Error(e));
        self
    }

    pub fn field(mut self, f: &Field) -> Self {
        if self.inner.is_some() {
            self.add_value(&f.key, &f.resolve());
        }
        self
    }

    pub fn fields(mut self, fields: &[Field]) -> Self {
        if self.inner.is_some() {
            for f in fields {
                self.add_value(&f.key, &f.resolve());
            }
        }
        self
    }

    /// Add an alternating list of keys and values.
    ///
    /// # Panics
    ///
    /// When the list has an odd length, or a key is not a string.
    pub fn kvs(mut self, kvs: &[Value]) -> Self {
        if self.inner.is_none() {
            return self;
        }
        if kvs.len() % 2 != 0 {
            panic!("the length of the key-value log contexts is not even");
        }
        for pair in kvs.chunks_exact(2) {
            match &pair[0] {
                Value::Str(key) => self.add_value(key, &pair[1]),
                other => panic!("the key of a key-value log context is not a string: {:?}", other),
            }
        }
        self
    }

    /// Set the module of the call site.
    #[inline]
    pub fn module(mut self, module: &'static str) -> Self {
        if let Some(p) = self.inner.as_mut() {
            p.site.module = Some(module);
        }
        self
    }

    /// Override the call site, for records coming from another logging facade.
    #[inline]
    pub fn at(mut self, site: CallSite) -> Self {
        if let Some(p) = self.inner.as_mut() {
            p.site = site;
        }
        self
    }

    /// Write the record with the message.
    ///
    /// The hooks run first. After a [Level::FATAL] record the writers are flushed and the
    /// process exits. Records from [Level::PANIC] up to it panic with the message once written.
    pub fn print(self, msg: &str) -> io::Result<()> {
        self.emit(msg)
    }

    /// Same as [Emitter::print], the message is only formatted when the record is enabled.
    pub fn printf(self, args: fmt::Arguments) -> io::Result<()> {
        if self.inner.is_none() {
            return Ok(());
        }
        match args.as_str() {
            Some(msg) => self.emit(msg),
            None => self.emit(&args.to_string()),
        }
    }

    fn emit(mut self, msg: &str) -> io::Result<()> {
        let (logger, level, site) = match self.inner.as_ref() {
            Some(p) => (p.logger, p.level, p.site),
            None => return Ok(()),
        };
        for hook in logger.hooks.iter() {
            hook.run(&mut self, logger.name(), level, &site);
        }
        let Some(mut p) = self.inner.take() else {
            return Ok(());
        };
        logger.encoder.end(&mut p.buf, msg);
        let r = logger.writer.write_level(level, &p.buf).map(|_| ());
        // Back to the pool before a panic or exit below.
        drop(p);

        if level == Level::FATAL {
            if let Err(e) = logger.writer.flush() {
                eprintln!("levelog: flush before exit failed: {:?}", e);
            }
            std::process::exit(logger.exit_code());
        } else if level >= Level::PANIC {
            panic!("{}", msg);
        }
        r
    }
}
