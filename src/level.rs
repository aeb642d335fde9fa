use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// The level of a log record.
///
/// Levels are small ordered integers in `0..=127`. A larger value means a more severe record.
/// [Level::TRACE] is the most verbose value, and [Level::DISABLED] is reserved: a record at that
/// level is never emitted, and a logger configured with it emits nothing.
///
/// Custom levels between the predefined ones are allowed, they render as `Level(n)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    pub const TRACE: Level = Level(0);
    pub const DEBUG: Level = Level(20);
    pub const INFO: Level = Level(40);
    pub const WARN: Level = Level(60);
    pub const ERROR: Level = Level(80);
    pub const ALERT: Level = Level(100);
    pub const PANIC: Level = Level(120);
    pub const FATAL: Level = Level(126);
    pub const DISABLED: Level = Level(127);

    /// The largest valid numeric level.
    pub const MAX: u8 = 127;

    /// Construct a level from its numeric value.
    ///
    /// # Panics
    ///
    /// When `value` is out of `0..=127`. An invalid level is a programming error.
    #[inline]
    pub const fn new(value: u8) -> Self {
        if value > Self::MAX {
            panic!("invalid level");
        }
        Level(value)
    }

    #[inline]
    pub const fn try_new(value: u8) -> Option<Self> {
        if value > Self::MAX {
            None
        } else {
            Some(Level(value))
        }
    }

    #[inline(always)]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub fn is_disabled(self) -> bool {
        self == Self::DISABLED
    }

    /// The lowercase display name, `None` for a custom level.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::TRACE => "trace",
            Self::DEBUG => "debug",
            Self::INFO => "info",
            Self::WARN => "warn",
            Self::ERROR => "error",
            Self::ALERT => "alert",
            Self::PANIC => "panic",
            Self::FATAL => "fatal",
            Self::DISABLED => "disabled",
            _ => return None,
        };
        Some(name)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::DEBUG
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "Level({})", self.0),
        }
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// The default level formatter of [JsonEncoder](crate::JsonEncoder).
pub fn format_level(level: Level) -> Cow<'static, str> {
    match level.name() {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(level.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown level '{0}'")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Case-insensitive, also accept the first letter as the short name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.to_ascii_lowercase().as_str() {
            "trace" | "t" => Self::TRACE,
            "debug" | "d" => Self::DEBUG,
            "info" | "i" => Self::INFO,
            "warn" | "warning" | "w" => Self::WARN,
            "error" | "e" => Self::ERROR,
            "alert" | "a" => Self::ALERT,
            "panic" | "p" => Self::PANIC,
            "fatal" | "f" => Self::FATAL,
            "disabled" | "disable" | "off" => Self::DISABLED,
            _ => return Err(ParseLevelError(s.to_string())),
        };
        Ok(level)
    }
}

/// Parse the level name.
///
/// # Panics
///
/// On an unrecognized name, which is considered a configuration error.
pub fn parse_level(s: &str) -> Level {
    match Level::from_str(s) {
        Ok(level) => level,
        Err(e) => panic!("{}", e),
    }
}

/// Parse the level name, return `default` when it is not recognized.
pub fn parse_level_or(s: &str, default: Level) -> Level {
    Level::from_str(s).unwrap_or(default)
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::ERROR,
            log::Level::Warn => Self::WARN,
            log::Level::Info => Self::INFO,
            log::Level::Debug => Self::DEBUG,
            log::Level::Trace => Self::TRACE,
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_new(value).ok_or(value)
    }
}
