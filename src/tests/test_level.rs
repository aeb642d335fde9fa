use crate::*;
use rstest::*;
use std::str::FromStr;

#[rstest]
#[case("trace", Level::TRACE)]
#[case("DEBUG", Level::DEBUG)]
#[case("Info", Level::INFO)]
#[case("warning", Level::WARN)]
#[case("W", Level::WARN)]
#[case("error", Level::ERROR)]
#[case("alert", Level::ALERT)]
#[case("p", Level::PANIC)]
#[case("FATAL", Level::FATAL)]
#[case("off", Level::DISABLED)]
fn test_parse_level(#[case] name: &str, #[case] level: Level) {
    assert_eq!(Level::from_str(name).unwrap(), level);
    assert_eq!(parse_level(name), level);
}

#[test]
fn test_parse_level_unknown() {
    assert_eq!(Level::from_str("verbose").unwrap_err(), ParseLevelError("verbose".to_string()));
    assert_eq!(parse_level_or("verbose", Level::INFO), Level::INFO);
    assert_eq!(parse_level_or("error", Level::INFO), Level::ERROR);
}

#[test]
#[should_panic(expected = "unknown level 'verbose'")]
fn test_parse_level_panic() {
    parse_level("verbose");
}

#[test]
fn test_level_order_and_names() {
    let levels = [
        Level::TRACE,
        Level::DEBUG,
        Level::INFO,
        Level::WARN,
        Level::ERROR,
        Level::ALERT,
        Level::PANIC,
        Level::FATAL,
        Level::DISABLED,
    ];
    for pair in levels.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    for level in levels {
        // every name parses back
        assert_eq!(parse_level(&level.to_string()), level);
    }
    assert_eq!(Level::default(), Level::DEBUG);
    assert_eq!(Level::new(50).to_string(), "Level(50)");
    assert_eq!(Level::new(50).name(), None);
    assert!(Level::DISABLED.is_disabled());
}

#[test]
fn test_level_range() {
    assert_eq!(Level::try_new(127), Some(Level::DISABLED));
    assert_eq!(Level::try_new(128), None);
    assert_eq!(Level::try_from(200u8), Err(200));
    assert_eq!(Level::try_from(40u8), Ok(Level::INFO));
}

#[test]
#[should_panic]
fn test_level_out_of_range() {
    let _ = Level::new(128);
}

#[test]
fn test_from_log_level() {
    assert_eq!(Level::from(log::Level::Trace), Level::TRACE);
    assert_eq!(Level::from(log::Level::Debug), Level::DEBUG);
    assert_eq!(Level::from(log::Level::Info), Level::INFO);
    assert_eq!(Level::from(log::Level::Warn), Level::WARN);
    assert_eq!(Level::from(log::Level::Error), Level::ERROR);
}
