//! Values of the key-value fields.
//!
//! # Encoding precedence
//!
//! A [Value] is encoded by the first matching rule below. The order is part of the output
//! format, some types offer several capabilities (an error is also displayable).
//!
//! 1. `Null`
//! 2. `Bool`, `Int`, `Uint`, `F32`, `F64`
//! 3. `Duration`, as a quoted compact string like `"1.5s"`
//! 4. `Time`, formatted by the encoder
//! 5. `Str`, `Bytes`
//! 6. `Raw`, pre-rendered JSON copied as it is
//! 7. `Encode` ([EncodeJson])
//! 8. `Write` ([WriteJson])
//! 9. `Error`, its message
//! 10. `Display`, its string form
//! 11. `Marshal` ([MarshalJson]), a failure renders `"JSONEncoderError: ..."`
//! 12. `Object` ([Loggable]), probing rules 7 to 11 in the same order, then `Debug`
//! 13. `Array`, `Map`
//!
//! There is no nil receiver in rust: an absent value is an `Option::None`, which converts to
//! `Null` before any capability can be reached.

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt;
use std::io;
use std::time::{Duration, SystemTime};

/// Encode itself as JSON into the buffer, the fastest path for user types.
pub trait EncodeJson {
    fn encode_json(&self, dst: &mut Vec<u8>);
}

/// Stream itself as JSON into a writer.
pub trait WriteJson {
    fn write_json(&self, w: &mut dyn io::Write) -> io::Result<()>;
}

/// Marshal itself into JSON bytes, may fail.
pub trait MarshalJson {
    fn marshal_json(&self) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>>;
}

/// A user type exposing a set of encoding capabilities.
///
/// The encoder asks for each capability in the fixed order of the methods below and uses the
/// first one available. Without any, the `Debug` form is logged as a string.
pub trait Loggable: fmt::Debug {
    fn as_encode_json(&self) -> Option<&dyn EncodeJson> {
        None
    }

    fn as_write_json(&self) -> Option<&dyn WriteJson> {
        None
    }

    fn as_error(&self) -> Option<&(dyn Error + 'static)> {
        None
    }

    fn as_display(&self) -> Option<&dyn fmt::Display> {
        None
    }

    fn as_marshal_json(&self) -> Option<&dyn MarshalJson> {
        None
    }
}

/// Bridge any `serde::Serialize` type to [MarshalJson].
///
/// ``` rust
/// use levelog::{Json, Value};
/// #[derive(serde::Serialize)]
/// struct Peer { addr: &'static str, port: u16 }
/// let peer = Json(Peer { addr: "10.0.0.1", port: 443 });
/// let _v = Value::from(&peer);
/// ```
#[derive(Debug, Clone)]
pub struct Json<T>(pub T);

impl<T: Serialize> MarshalJson for Json<T> {
    fn marshal_json(&self) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
        Ok(serde_json::to_vec(&self.0)?)
    }
}

/// A value of a key-value field.
#[derive(Clone)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    F32(f32),
    F64(f64),
    Duration(Duration),
    Time(DateTime<FixedOffset>),
    Str(Cow<'a, str>),
    /// Arbitrary bytes logged as a string, invalid UTF-8 is replaced.
    Bytes(Cow<'a, [u8]>),
    /// Trusted JSON text, copied into the record without validation.
    Raw(Cow<'a, [u8]>),
    Encode(&'a (dyn EncodeJson + Sync)),
    Write(&'a (dyn WriteJson + Sync)),
    Error(&'a (dyn Error + Sync)),
    Display(&'a (dyn fmt::Display + Sync)),
    Marshal(&'a (dyn MarshalJson + Sync)),
    Object(&'a (dyn Loggable + Sync)),
    Array(Vec<Value<'a>>),
    /// String-keyed map, encoded in the order of the entries.
    Map(Vec<(Cow<'a, str>, Value<'a>)>),
}

impl<'a> Value<'a> {
    #[inline]
    pub fn display(v: &'a (dyn fmt::Display + Sync)) -> Self {
        Value::Display(v)
    }

    #[inline]
    pub fn error(e: &'a (dyn Error + Sync)) -> Self {
        Value::Error(e)
    }

    #[inline]
    pub fn object(v: &'a (dyn Loggable + Sync)) -> Self {
        Value::Object(v)
    }

    #[inline]
    pub fn raw(json: &'a str) -> Self {
        Value::Raw(Cow::Borrowed(json.as_bytes()))
    }

    /// Marshal `v` with serde when the record is encoded.
    #[inline]
    pub fn json<T: Serialize + Sync>(v: &'a Json<T>) -> Self {
        Value::Marshal(v)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Detach the value from anything it borrows.
    ///
    /// Capability values are rendered right now: the capabilities producing JSON become `Raw`,
    /// errors and displayable values become `Str`. Times keep their type, because their layout
    /// belongs to the encoder.
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Bool(v) => Value::Bool(v),
            Value::Int(v) => Value::Int(v),
            Value::Uint(v) => Value::Uint(v),
            Value::F32(v) => Value::F32(v),
            Value::F64(v) => Value::F64(v),
            Value::Duration(v) => Value::Duration(v),
            Value::Time(v) => Value::Time(v),
            Value::Str(s) => Value::Str(Cow::Owned(s.into_owned())),
            Value::Bytes(b) => Value::Bytes(Cow::Owned(b.into_owned())),
            Value::Raw(b) => Value::Raw(Cow::Owned(b.into_owned())),
            Value::Encode(v) => {
                let mut buf = Vec::new();
                v.encode_json(&mut buf);
                Value::Raw(Cow::Owned(buf))
            }
            Value::Write(v) => Value::Raw(Cow::Owned(write_json_to_vec(v))),
            Value::Error(e) => Value::Str(Cow::Owned(e.to_string())),
            Value::Display(v) => Value::Str(Cow::Owned(v.to_string())),
            Value::Marshal(v) => Value::Raw(Cow::Owned(marshal_to_vec(v))),
            Value::Object(v) => object_into_owned(v),
            Value::Array(items) => Value::Array(items.into_iter().map(Value::into_owned).collect()),
            Value::Map(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (Cow::Owned(k.into_owned()), v.into_owned()))
                    .collect(),
            ),
        }
    }
}

fn object_into_owned(v: &(dyn Loggable + Sync)) -> Value<'static> {
    if let Some(e) = v.as_encode_json() {
        let mut buf = Vec::new();
        e.encode_json(&mut buf);
        Value::Raw(Cow::Owned(buf))
    } else if let Some(w) = v.as_write_json() {
        Value::Raw(Cow::Owned(write_json_to_vec(w)))
    } else if let Some(e) = v.as_error() {
        Value::Str(Cow::Owned(e.to_string()))
    } else if let Some(d) = v.as_display() {
        Value::Str(Cow::Owned(d.to_string()))
    } else if let Some(m) = v.as_marshal_json() {
        Value::Raw(Cow::Owned(marshal_to_vec(m)))
    } else {
        Value::Str(Cow::Owned(format!("{:?}", v)))
    }
}

fn write_json_to_vec(v: &dyn WriteJson) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Err(e) = v.write_json(&mut buf) {
        buf.clear();
        crate::escape::append_json_str(&mut buf, &format!("JSONEncoderError: {}", e));
    }
    buf
}

fn marshal_to_vec(v: &dyn MarshalJson) -> Vec<u8> {
    match v.marshal_json() {
        Ok(data) => data,
        Err(e) => {
            let mut buf = Vec::new();
            crate::escape::append_json_str(&mut buf, &format!("JSONEncoderError: {}", e));
            buf
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Uint(v) => write!(f, "Uint({})", v),
            Value::F32(v) => write!(f, "F32({})", v),
            Value::F64(v) => write!(f, "F64({})", v),
            Value::Duration(v) => write!(f, "Duration({:?})", v),
            Value::Time(v) => write!(f, "Time({})", v),
            Value::Str(v) => write!(f, "Str({:?})", v),
            Value::Bytes(v) => write!(f, "Bytes({:?})", String::from_utf8_lossy(v)),
            Value::Raw(v) => write!(f, "Raw({})", String::from_utf8_lossy(v)),
            Value::Encode(_) => f.write_str("Encode(..)"),
            Value::Write(_) => f.write_str("Write(..)"),
            Value::Error(e) => write!(f, "Error({})", e),
            Value::Display(v) => write!(f, "Display({})", v),
            Value::Marshal(_) => f.write_str("Marshal(..)"),
            Value::Object(v) => write!(f, "Object({:?})", v),
            Value::Array(v) => f.debug_list().entries(v.iter()).finish(),
            Value::Map(v) => f.debug_map().entries(v.iter().map(|(k, v)| (k, v))).finish(),
        }
    }
}

macro_rules! impl_from_int {
    ($variant: ident, $target: ty, $($t: ty),+) => {
        $(
            impl From<$t> for Value<'_> {
                #[inline(always)]
                fn from(v: $t) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )+
    };
}

impl_from_int!(Int, i64, i8, i16, i32, i64, isize);
impl_from_int!(Uint, u64, u8, u16, u32, u64, usize);

impl From<bool> for Value<'_> {
    #[inline(always)]
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value<'_> {
    #[inline(always)]
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value<'_> {
    #[inline(always)]
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<Duration> for Value<'_> {
    #[inline(always)]
    fn from(v: Duration) -> Self {
        Value::Duration(v)
    }
}

impl From<DateTime<FixedOffset>> for Value<'_> {
    #[inline(always)]
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::Time(v)
    }
}

impl From<DateTime<Utc>> for Value<'_> {
    #[inline(always)]
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v.fixed_offset())
    }
}

impl From<DateTime<Local>> for Value<'_> {
    #[inline(always)]
    fn from(v: DateTime<Local>) -> Self {
        Value::Time(v.fixed_offset())
    }
}

impl From<SystemTime> for Value<'_> {
    #[inline(always)]
    fn from(v: SystemTime) -> Self {
        Value::Time(DateTime::<Utc>::from(v).fixed_offset())
    }
}

impl<'a> From<&'a str> for Value<'a> {
    #[inline(always)]
    fn from(v: &'a str) -> Self {
        Value::Str(Cow::Borrowed(v))
    }
}

impl<'a> From<&'a String> for Value<'a> {
    #[inline(always)]
    fn from(v: &'a String) -> Self {
        Value::Str(Cow::Borrowed(v.as_str()))
    }
}

impl From<String> for Value<'_> {
    #[inline(always)]
    fn from(v: String) -> Self {
        Value::Str(Cow::Owned(v))
    }
}

impl<'a> From<Cow<'a, str>> for Value<'a> {
    #[inline(always)]
    fn from(v: Cow<'a, str>) -> Self {
        Value::Str(v)
    }
}

impl<'a> From<&'a io::Error> for Value<'a> {
    #[inline(always)]
    fn from(e: &'a io::Error) -> Self {
        Value::Error(e)
    }
}

impl<'a, T: Serialize + Sync> From<&'a Json<T>> for Value<'a> {
    #[inline(always)]
    fn from(v: &'a Json<T>) -> Self {
        Value::Marshal(v)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    #[inline]
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<'a> From<&'a [&'a str]> for Value<'a> {
    fn from(v: &'a [&'a str]) -> Self {
        Value::Array(v.iter().map(|s| Value::Str(Cow::Borrowed(*s))).collect())
    }
}

impl<'a> From<&'a [String]> for Value<'a> {
    fn from(v: &'a [String]) -> Self {
        Value::Array(v.iter().map(|s| Value::Str(Cow::Borrowed(s.as_str()))).collect())
    }
}

impl<'a> From<&'a Vec<String>> for Value<'a> {
    fn from(v: &'a Vec<String>) -> Self {
        Value::from(v.as_slice())
    }
}

macro_rules! impl_from_int_slice {
    ($variant: ident, $target: ty, $($t: ty),+) => {
        $(
            impl<'a> From<&'a [$t]> for Value<'a> {
                fn from(v: &'a [$t]) -> Self {
                    Value::Array(v.iter().map(|i| Value::$variant(*i as $target)).collect())
                }
            }

            impl<'a> From<&'a Vec<$t>> for Value<'a> {
                fn from(v: &'a Vec<$t>) -> Self {
                    Value::from(v.as_slice())
                }
            }
        )+
    };
}

impl_from_int_slice!(Int, i64, i32, i64, isize);
impl_from_int_slice!(Uint, u64, u32, u64, usize);

impl<'a> From<Vec<Value<'a>>> for Value<'a> {
    #[inline(always)]
    fn from(v: Vec<Value<'a>>) -> Self {
        Value::Array(v)
    }
}

impl<'a> From<&'a HashMap<String, String>> for Value<'a> {
    fn from(m: &'a HashMap<String, String>) -> Self {
        Value::Map(
            m.iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), Value::Str(Cow::Borrowed(v.as_str()))))
                .collect(),
        )
    }
}

impl<'a> From<&'a BTreeMap<String, String>> for Value<'a> {
    fn from(m: &'a BTreeMap<String, String>) -> Self {
        Value::Map(
            m.iter()
                .map(|(k, v)| (Cow::Borrowed(k.as_str()), Value::Str(Cow::Borrowed(v.as_str()))))
                .collect(),
        )
    }
}

impl<'a> From<&'a HashMap<String, Value<'a>>> for Value<'a> {
    fn from(m: &'a HashMap<String, Value<'a>>) -> Self {
        Value::Map(m.iter().map(|(k, v)| (Cow::Borrowed(k.as_str()), v.clone())).collect())
    }
}
