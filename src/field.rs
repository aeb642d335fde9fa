use crate::encoder::Encoder;
use crate::value::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// The value part of a [Field], either ready or computed on demand.
pub enum FieldValue<'a> {
    Value(Value<'a>),
    /// Only called when the record is really built.
    Lazy(Box<dyn Fn() -> Value<'a> + 'a>),
}

/// A key-value pair attached to one record.
pub struct Field<'a> {
    pub key: Cow<'a, str>,
    pub value: FieldValue<'a>,
}

impl<'a> Field<'a> {
    #[inline]
    pub fn new(key: impl Into<Cow<'a, str>>, value: impl Into<Value<'a>>) -> Self {
        Self { key: key.into(), value: FieldValue::Value(value.into()) }
    }

    #[inline]
    pub fn lazy<F>(key: impl Into<Cow<'a, str>>, f: F) -> Self
    where
        F: Fn() -> Value<'a> + 'a,
    {
        Self { key: key.into(), value: FieldValue::Lazy(Box::new(f)) }
    }

    /// Produce the value, calling the closure of a lazy field.
    pub fn resolve(&self) -> Cow<'_, Value<'a>> {
        match &self.value {
            FieldValue::Value(v) => Cow::Borrowed(v),
            FieldValue::Lazy(f) => Cow::Owned(f()),
        }
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.value {
            FieldValue::Value(v) => write!(f, "{}={:?}", self.key, v),
            FieldValue::Lazy(_) => write!(f, "{}=<lazy>", self.key),
        }
    }
}

/// Shorthand of [Field::new].
#[inline]
pub fn field<'a>(key: impl Into<Cow<'a, str>>, value: impl Into<Value<'a>>) -> Field<'a> {
    Field::new(key, value)
}

pub type LazyValue = Arc<dyn Fn() -> Value<'static> + Send + Sync>;

#[derive(Clone)]
pub(crate) enum CtxValue {
    Value(Value<'static>),
    Lazy(LazyValue),
}

#[derive(Clone)]
enum Segment {
    /// Fields already encoded, copied as they are into each record.
    Encoded(Vec<u8>),
    Lazy(Cow<'static, str>, LazyValue),
}

/// The fields inherited by every record of a logger.
///
/// Ready values are encoded once when they are added. Lazy ones keep their place in the order
/// and are called for each record. The original values are kept to re-encode the context when
/// the logger changes its encoder.
#[derive(Clone, Default)]
pub(crate) struct Context {
    entries: Vec<(Cow<'static, str>, CtxValue)>,
    segments: Vec<Segment>,
}

impl Context {
    pub fn push(&mut self, encoder: &dyn Encoder, key: Cow<'static, str>, value: CtxValue) {
        match &value {
            CtxValue::Value(v) => {
                if let Some(Segment::Encoded(buf)) = self.segments.last_mut() {
                    encoder.encode(buf, &key, v);
                } else {
                    let mut buf = Vec::new();
                    encoder.encode(&mut buf, &key, v);
                    self.segments.push(Segment::Encoded(buf));
                }
            }
            CtxValue::Lazy(f) => self.segments.push(Segment::Lazy(key.clone(), f.clone())),
        }
        self.entries.push((key, value));
    }

    /// Encode the same entries with another encoder.
    pub fn reencode(&self, encoder: &dyn Encoder) -> Context {
        let mut ctx = Context::default();
        for (key, value) in &self.entries {
            ctx.push(encoder, key.clone(), value.clone());
        }
        ctx
    }

    pub fn write_to(&self, encoder: &dyn Encoder, buf: &mut Vec<u8>) {
        for seg in &self.segments {
            match seg {
                Segment::Encoded(data) => buf.extend_from_slice(data),
                Segment::Lazy(key, f) => encoder.encode(buf, key, &f()),
            }
        }
    }
}
