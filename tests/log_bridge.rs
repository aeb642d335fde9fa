use levelog::*;
use std::sync::Arc;

mod common;
use common::*;

// `log` accepts one global logger per process, keep a single test in this file.
#[test]
fn test_log_bridge() {
    let capture = Capture::default();
    let logger = Logger::new("bridge")
        .with_global_state(Arc::new(GlobalState::new()))
        .with_encoder(JsonEncoder::new().time_key(""))
        .with_writer(capture.clone())
        .add_hook(Caller::new("caller"));
    logger.set_level(Level::INFO);
    LogBridge::install(logger.clone()).unwrap();
    assert_eq!(log::max_level(), log::LevelFilter::Trace);
    assert!(LogBridge::install_default().is_err());

    log::debug!("filtered by the logger level");
    assert!(!log::log_enabled!(log::Level::Debug));
    assert!(log::log_enabled!(log::Level::Info));

    let line = line!() + 1;
    log::info!(user = 3, admin = false, name = "bob", ratio = 0.5; "login {}", "ok");
    log::error!(target: "db", "connection lost");
    logger.set_level(Level::DEBUG);
    log::debug!("now visible");
    log::logger().flush();

    let lines = capture.json_lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["lvl"], "info");
    assert_eq!(lines[0]["logger"], "bridge");
    assert_eq!(lines[0]["msg"], "login ok");
    assert_eq!(lines[0]["user"], 3);
    assert_eq!(lines[0]["admin"], false);
    assert_eq!(lines[0]["name"], "bob");
    assert_eq!(lines[0]["ratio"], 0.5);
    assert_eq!(lines[0]["caller"], format!("log_bridge.rs:{}", line));
    assert_eq!(lines[1]["lvl"], "error");
    assert_eq!(lines[1]["msg"], "connection lost");
    assert_eq!(lines[2]["lvl"], "debug");
}
