use crate::escape::{append_json_bytes, append_json_str};
use crate::level::{format_level, Level};
use crate::value::{Loggable, Value};
use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::io::Write as _;
use std::time::Duration;

/// Frame a log record into a byte buffer.
///
/// A record is always produced as `start`, any number of `encode`, then `end`. The buffer is
/// handed over between the phases, so the encoder itself carries no per-record state.
pub trait Encoder: Send + Sync {
    fn start(&self, buf: &mut Vec<u8>, name: &str, level: Level);

    fn encode(&self, buf: &mut Vec<u8>, key: &str, value: &Value);

    fn end(&self, buf: &mut Vec<u8>, msg: &str);
}

/// How [JsonEncoder] renders the record time and [Value::Time] fields.
#[derive(Clone, Copy)]
pub enum TimeFormat {
    /// RFC 3339 with as many sub-second digits as needed, the default.
    Rfc3339,
    /// A chrono strftime layout, rendered as a JSON string.
    Strftime(&'static str),
    /// Append the complete JSON value of the time, including the quotes if it is a string.
    Custom(fn(&mut Vec<u8>, &DateTime<FixedOffset>)),
}

impl fmt::Debug for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TimeFormat::Rfc3339 => f.write_str("Rfc3339"),
            TimeFormat::Strftime(s) => write!(f, "Strftime({:?})", s),
            TimeFormat::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn local_now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Encode the records as JSON objects, one per line by default.
///
/// ``` text
/// {"t":"2024-05-01T10:00:00.123+08:00","lvl":"info","logger":"app.db","conn":3,"msg":"connected"}
/// ```
///
/// Each of the time, level and logger fields is written only when its key is not empty.
/// The message field always comes last.
#[derive(Clone, Debug)]
pub struct JsonEncoder {
    /// Append a newline after each record. Default true.
    pub newline: bool,

    /// Default "t".
    pub time_key: Cow<'static, str>,

    pub time_format: TimeFormat,

    /// Default "lvl".
    pub level_key: Cow<'static, str>,

    pub level_format: fn(Level) -> Cow<'static, str>,

    /// Default "logger". The field is skipped for a logger without name.
    pub logger_key: Cow<'static, str>,

    /// Default "msg".
    pub msg_key: Cow<'static, str>,

    /// The source of the record time, replaceable for tests.
    pub clock: fn() -> DateTime<FixedOffset>,
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self {
            newline: true,
            time_key: Cow::Borrowed("t"),
            time_format: TimeFormat::Rfc3339,
            level_key: Cow::Borrowed("lvl"),
            level_format: format_level,
            logger_key: Cow::Borrowed("logger"),
            msg_key: Cow::Borrowed("msg"),
            clock: local_now,
        }
    }
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn newline(mut self, newline: bool) -> Self {
        self.newline = newline;
        self
    }

    /// Empty key to disable the time field.
    pub fn time_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.time_key = key.into();
        self
    }

    pub fn time_format(mut self, format: TimeFormat) -> Self {
        self.time_format = format;
        self
    }

    /// Empty key to disable the level field.
    pub fn level_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.level_key = key.into();
        self
    }

    pub fn level_format(mut self, f: fn(Level) -> Cow<'static, str>) -> Self {
        self.level_format = f;
        self
    }

    /// Empty key to disable the logger name field.
    pub fn logger_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.logger_key = key.into();
        self
    }

    pub fn msg_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.msg_key = key.into();
        self
    }

    pub fn clock(mut self, clock: fn() -> DateTime<FixedOffset>) -> Self {
        self.clock = clock;
        self
    }

    fn append_time(&self, buf: &mut Vec<u8>, t: &DateTime<FixedOffset>) {
        match self.time_format {
            TimeFormat::Rfc3339 => {
                buf.push(b'"');
                buf.extend_from_slice(t.to_rfc3339_opts(SecondsFormat::AutoSi, true).as_bytes());
                buf.push(b'"');
            }
            TimeFormat::Strftime(layout) => {
                let mut s = String::with_capacity(32);
                // An invalid layout fails the formatter, keep the record valid anyway.
                if write!(s, "{}", t.format(layout)).is_err() {
                    s.clear();
                }
                append_json_str(buf, &s);
            }
            TimeFormat::Custom(f) => f(buf, t),
        }
    }

    /// Append the JSON form of `value` into `buf`, without key and separator.
    pub fn append_value(&self, buf: &mut Vec<u8>, value: &Value) {
        match value {
            Value::Null => buf.extend_from_slice(b"null"),
            Value::Bool(true) => buf.extend_from_slice(b"true"),
            Value::Bool(false) => buf.extend_from_slice(b"false"),
            Value::Int(v) => {
                let _ = write!(buf, "{}", v);
            }
            Value::Uint(v) => {
                let _ = write!(buf, "{}", v);
            }
            Value::F32(v) => append_float(buf, *v as f64, v.is_finite(), |buf| {
                let _ = write!(buf, "{}", v);
            }),
            Value::F64(v) => append_float(buf, *v, v.is_finite(), |buf| {
                let _ = write!(buf, "{}", v);
            }),
            Value::Duration(d) => {
                buf.push(b'"');
                append_duration(buf, *d);
                buf.push(b'"');
            }
            Value::Time(t) => self.append_time(buf, t),
            Value::Str(s) => append_json_str(buf, s),
            Value::Bytes(b) => append_json_bytes(buf, b),
            Value::Raw(raw) => buf.extend_from_slice(raw),
            Value::Encode(v) => v.encode_json(buf),
            Value::Write(v) => {
                let start = buf.len();
                if let Err(e) = v.write_json(buf) {
                    buf.truncate(start);
                    append_encode_error(buf, &e);
                }
            }
            Value::Error(e) => append_display(buf, e),
            Value::Display(v) => append_display(buf, v),
            Value::Marshal(v) => match v.marshal_json() {
                Ok(data) => buf.extend_from_slice(&data),
                Err(e) => append_encode_error(buf, &e),
            },
            Value::Object(v) => self.append_object(buf, *v),
            Value::Array(items) => {
                buf.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        buf.push(b',');
                    }
                    self.append_value(buf, item);
                }
                buf.push(b']');
            }
            Value::Map(entries) => {
                buf.push(b'{');
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        buf.push(b',');
                    }
                    append_json_str(buf, k);
                    buf.push(b':');
                    self.append_value(buf, v);
                }
                buf.push(b'}');
            }
        }
    }

    fn append_object(&self, buf: &mut Vec<u8>, v: &(dyn Loggable + Sync)) {
        if let Some(e) = v.as_encode_json() {
            e.encode_json(buf);
        } else if let Some(w) = v.as_write_json() {
            let start = buf.len();
            if let Err(e) = w.write_json(buf) {
                buf.truncate(start);
                append_encode_error(buf, &e);
            }
        } else if let Some(e) = v.as_error() {
            append_display(buf, &e);
        } else if let Some(d) = v.as_display() {
            append_display(buf, d);
        } else if let Some(m) = v.as_marshal_json() {
            match m.marshal_json() {
                Ok(data) => buf.extend_from_slice(&data),
                Err(e) => append_encode_error(buf, &e),
            }
        } else {
            append_json_str(buf, &format!("{:?}", v));
        }
    }
}

impl Encoder for JsonEncoder {
    fn start(&self, buf: &mut Vec<u8>, name: &str, level: Level) {
        buf.push(b'{');
        if !self.time_key.is_empty() {
            append_json_str(buf, &self.time_key);
            buf.push(b':');
            self.append_time(buf, &(self.clock)());
            buf.push(b',');
        }
        if !self.level_key.is_empty() {
            append_json_str(buf, &self.level_key);
            buf.push(b':');
            append_json_str(buf, &(self.level_format)(level));
            buf.push(b',');
        }
        if !self.logger_key.is_empty() && !name.is_empty() {
            append_json_str(buf, &self.logger_key);
            buf.push(b':');
            append_json_str(buf, name);
            buf.push(b',');
        }
    }

    #[inline]
    fn encode(&self, buf: &mut Vec<u8>, key: &str, value: &Value) {
        append_json_str(buf, key);
        buf.push(b':');
        self.append_value(buf, value);
        buf.push(b',');
    }

    fn end(&self, buf: &mut Vec<u8>, msg: &str) {
        append_json_str(buf, &self.msg_key);
        buf.push(b':');
        append_json_str(buf, msg);
        buf.push(b'}');
        if self.newline {
            buf.push(b'\n');
        }
    }
}

#[inline]
fn append_float(buf: &mut Vec<u8>, v: f64, finite: bool, render: impl FnOnce(&mut Vec<u8>)) {
    if finite {
        render(buf);
    } else if v.is_nan() {
        buf.extend_from_slice(b"\"NaN\"");
    } else if v > 0.0 {
        buf.extend_from_slice(b"\"+Inf\"");
    } else {
        buf.extend_from_slice(b"\"-Inf\"");
    }
}

fn append_display(buf: &mut Vec<u8>, v: &dyn fmt::Display) {
    let mut s = String::new();
    let _ = write!(s, "{}", v);
    append_json_str(buf, &s);
}

fn append_encode_error(buf: &mut Vec<u8>, e: &dyn fmt::Display) {
    append_json_str(buf, &format!("JSONEncoderError: {}", e));
}

/// Render the duration in the compact form `1h2m3.5s`, `250ms`, `1.5µs`, `0s`.
pub fn append_duration(buf: &mut Vec<u8>, d: Duration) {
    let nanos = d.subsec_nanos();
    let secs = d.as_secs();
    if secs == 0 {
        match nanos {
            0 => buf.extend_from_slice(b"0s"),
            1..=999 => {
                let _ = write!(buf, "{}ns", nanos);
            }
            1_000..=999_999 => {
                append_fraction(buf, (nanos / 1_000) as u64, nanos % 1_000, 3);
                buf.extend_from_slice("µs".as_bytes());
            }
            _ => {
                append_fraction(buf, (nanos / 1_000_000) as u64, nanos % 1_000_000, 6);
                buf.extend_from_slice(b"ms");
            }
        }
        return;
    }
    let hours = secs / 3600;
    let minutes = (secs / 60) % 60;
    if hours > 0 {
        let _ = write!(buf, "{}h{}m", hours, minutes);
    } else if minutes > 0 {
        let _ = write!(buf, "{}m", minutes);
    }
    append_fraction(buf, secs % 60, nanos, 9);
    buf.push(b's');
}

/// Append `int.frac` with the trailing zeros of the fraction trimmed.
fn append_fraction(buf: &mut Vec<u8>, int: u64, frac: u32, digits: usize) {
    let _ = write!(buf, "{}", int);
    if frac == 0 {
        return;
    }
    let mut s = format!("{:0width$}", frac, width = digits);
    while s.ends_with('0') {
        s.pop();
    }
    buf.push(b'.');
    buf.extend_from_slice(s.as_bytes());
}
