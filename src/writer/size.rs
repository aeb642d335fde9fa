use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseSizeError {
    #[error("unknown size string '{0}'")]
    Unknown(String),
    #[error("size '{0}' overflows")]
    Overflow(String),
}

fn size_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+)([bBkKmMgGtTpPeE]?)$").expect("valid size regex"))
}

/// Parse a size with an optional unit suffix, like `"123"`, `"10k"`, `"100M"`.
///
/// `b` and `B` are bytes. The lower case units `k m g t p e` are powers of 1000, the upper
/// case units `K M G T P E` are powers of 1024. An empty string is 0.
///
/// ``` rust
/// use levelog::parse_size;
/// assert_eq!(parse_size("2k").unwrap(), 2000);
/// assert_eq!(parse_size("2K").unwrap(), 2048);
/// ```
pub fn parse_size(s: &str) -> Result<u64, ParseSizeError> {
    if s.is_empty() {
        return Ok(0);
    }
    let caps = size_re().captures(s).ok_or_else(|| ParseSizeError::Unknown(s.to_string()))?;
    let num: u64 = caps[1].parse().map_err(|_| ParseSizeError::Overflow(s.to_string()))?;
    let (base, exp): (u64, u32) = match &caps[2] {
        "" | "b" | "B" => (1, 0),
        "k" => (1000, 1),
        "K" => (1024, 1),
        "m" => (1000, 2),
        "M" => (1024, 2),
        "g" => (1000, 3),
        "G" => (1024, 3),
        "t" => (1000, 4),
        "T" => (1024, 4),
        "p" => (1000, 5),
        "P" => (1024, 5),
        "e" => (1000, 6),
        _ => (1024, 6),
    };
    num.checked_mul(base.pow(exp)).ok_or_else(|| ParseSizeError::Overflow(s.to_string()))
}
