use levelog::*;
use std::fs;

mod common;
use common::*;

// The default logger and the `log` backend are process-wide, keep a single test in this file.
#[test]
fn test_setup_default_logger() {
    lock_file!();
    let dir = "/tmp/levelog/setup";
    let _ = fs::remove_dir_all(dir);
    let builder = recipe::split_error_file_logger(dir, "setup", Level::DEBUG).test();
    clear_test_files(&builder);
    let logger = builder.setup();
    assert_eq!(logger.level(), Level::DEBUG);

    log_trace!("not written");
    log_debug!("started {}", 1);
    log_info!({ "port" => 8080 }, "listening");
    log::warn!(retry = 2; "slow start");
    log_error!("failed {}", "twice");
    log_assert!(default_logger(), 1 + 1 == 2);
    default_logger().flush().unwrap();

    let records: Vec<JsonRecord> = LogParser::new(format!("{}/setup.log", dir), 4096)
        .unwrap()
        .lines()
        .map(|r| r.unwrap())
        .collect();
    let msgs: Vec<&str> = records.iter().map(|r| r["msg"].as_str().unwrap()).collect();
    assert_eq!(msgs, vec!["started 1", "listening", "slow start", "failed twice"]);
    assert_eq!(records[1]["port"], 8080);
    assert_eq!(records[2]["retry"], 2);
    assert!(records[0]["caller"].as_str().unwrap().starts_with("setup.rs:"));

    let errors: Vec<JsonRecord> = LogParser::new(format!("{}/setup.log.wf", dir), 4096)
        .unwrap()
        .lines()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["msg"], "failed twice");

    // a second setup replaces the default logger, the bridge follows it
    let capture = Capture::default();
    let replaced = Logger::new("replaced")
        .with_encoder(JsonEncoder::new().time_key(""))
        .with_writer(capture.clone());
    set_default_logger(replaced);
    log::info!("to the new default");
    log_info!("by macro");
    let lines = capture.json_lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["logger"], "replaced");
    assert_eq!(lines[1]["msg"], "by macro");
    logger.close().unwrap();
}
