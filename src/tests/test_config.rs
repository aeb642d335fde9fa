use super::utils::*;
use crate::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn test_dir(name: &str) -> PathBuf {
    let dir = Path::new("/tmp/levelog").join(name);
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn messages(path: &Path) -> Vec<String> {
    LogParser::new(path, 4096)
        .unwrap()
        .lines()
        .map(|r| r.unwrap()["msg"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_min_level() {
    let dir = test_dir("config_min_level");
    let builder = Builder::default();
    assert_eq!(builder.get_min_level(), Level::DISABLED);
    assert!(builder.file_paths().is_empty());

    let builder = builder
        .file(LogFile::new(&dir, "app.log", Level::INFO))
        .console(LogConsole::new(ConsoleTarget::Stderr, Level::WARN));
    assert_eq!(builder.get_min_level(), Level::INFO);
    assert_eq!(builder.file_paths(), vec![dir.join("app.log").as_path()]);
    assert!(dir.is_dir());

    let builder = Builder::new().console(LogConsole::new(ConsoleTarget::Stdout, Level::ERROR));
    assert_eq!(builder.build().level(), Level::ERROR);
    assert_eq!(builder.level(Level::TRACE).build().level(), Level::TRACE);
}

#[test]
fn test_log_file_rotation() {
    let dir = test_dir("config_log_file");
    let file = LogFile::new(&dir, "app.log", Level::INFO);
    assert_eq!(file.max_size, DEFAULT_MAX_SIZE);
    assert_eq!(file.backups, 100);
    assert_eq!(file.flush_size, None);

    let file = file.rotation("10K", 3);
    assert_eq!(file.max_size, 10 * 1024);
    assert_eq!(file.backups, 3);
    assert_eq!(file.clone().rotation("", 3).max_size, DEFAULT_MAX_SIZE);
    assert_eq!(file.buffered(0).flush_size, Some(0));
}

#[test]
#[should_panic(expected = "unknown size string")]
fn test_log_file_bad_rotation() {
    let _ = LogFile::new(test_dir("config_bad_rotation"), "app.log", Level::INFO).rotation("big", 3);
}

#[test]
fn test_build_split_files() {
    lock_file!();
    let dir = test_dir("config_split_files");
    let builder = Builder::default()
        .name("svc")
        .file(LogFile::new(&dir, "svc.log", Level::INFO))
        .file(LogFile::new(&dir, "svc.log.wf", Level::ERROR))
        .encoder(test_encoder())
        .global(Arc::new(GlobalState::new()));
    clear_test_files(&builder);

    let logger = builder.build();
    assert_eq!(logger.name(), "svc");
    assert_eq!(logger.level(), Level::INFO);
    logger.debug().print("debug").unwrap();
    logger.info().print("info").unwrap();
    logger.child("db").warn().print("warn").unwrap();
    logger.error().print("error").unwrap();
    logger.close().unwrap();

    assert_eq!(messages(&dir.join("svc.log")), vec!["info", "warn", "error"]);
    assert_eq!(messages(&dir.join("svc.log.wf")), vec!["error"]);
    let line = fs::read_to_string(dir.join("svc.log.wf")).unwrap();
    assert_eq!(line, "{\"lvl\":\"error\",\"logger\":\"svc\",\"msg\":\"error\"}\n");
}

#[test]
fn test_split_error_file_logger() {
    lock_file!();
    let dir = test_dir("config_split_error");
    let builder = recipe::split_error_file_logger(&dir, "job", Level::DEBUG)
        .global(Arc::new(GlobalState::new()));
    assert!(builder.panic);
    assert_eq!(builder.caller, Some("caller"));

    let logger = builder.build();
    logger.debug().print("step").unwrap();
    let line = line!() + 1;
    logger.error().kv("code", 3).print("failed").unwrap();
    logger.close().unwrap();

    assert_eq!(messages(&dir.join("job.log")), vec!["step", "failed"]);
    let records: Vec<JsonRecord> =
        LogParser::new(dir.join("job.log.wf"), 4096).unwrap().lines().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["code"], 3);
    assert_eq!(records[0]["caller"], format!("test_config.rs:{}", line));
}

#[test]
fn test_buffered_log_file() {
    lock_file!();
    let dir = test_dir("config_buffered");
    let path = dir.join("app.log");
    let logger = Builder::default()
        .file(LogFile::new(&dir, "app.log", Level::INFO).buffered(0))
        .global(Arc::new(GlobalState::new()))
        .build();
    logger.info().print("held").unwrap();
    assert!(!path.exists() || fs::metadata(&path).unwrap().len() == 0);
    logger.flush().unwrap();
    assert_eq!(messages(&path), vec!["held"]);
    logger.close().unwrap();
}

#[test]
fn test_builder_sampler_and_stack() {
    let builder = Builder::new()
        .name("app")
        .level(Level::DEBUG)
        .sampler(|name: &str, _level: Level| name == "app")
        .stack("stack")
        .global(Arc::new(GlobalState::new()));
    assert!(builder.sampler.is_some());
    assert_eq!(builder.stack, Some("stack"));
    let logger = builder.build();
    assert!(logger.sampler().is_some());
    assert!(logger.enabled(Level::INFO));
    assert!(!logger.child("sub").enabled(Level::ERROR));
    // no sink, nothing is written
    assert!(logger.info().print("discarded").is_ok());
}

#[test]
fn test_recipes() {
    let builder = recipe::stderr_logger(Level::DEBUG);
    assert!(!builder.panic);
    assert!(builder.log_bridge);
    assert_eq!(builder.caller, Some("caller"));
    assert_eq!(builder.get_min_level(), Level::DEBUG);
    assert!(builder.file_paths().is_empty());
    assert!(!recipe::stdout_logger(Level::INFO).panic);

    let path = test_dir("config_recipes").join("app.log");
    let builder = recipe::rotated_file_logger(&path, Level::INFO, "1M", 2);
    assert!(builder.panic);
    assert_eq!(builder.continue_when_panic, !cfg!(debug_assertions));
    assert_eq!(builder.file_paths(), vec![path.as_path()]);
    assert!(!builder.test().panic);

    let builder = recipe::file_logger(&path, Level::WARN);
    assert_eq!(builder.get_min_level(), Level::WARN);
    let builder = recipe::buffered_file_logger(&path, Level::WARN);
    assert_eq!(builder.file_paths(), vec![path.as_path()]);
}

#[test]
fn test_env_or() {
    std::env::set_var("LEVELOG_TEST_LEVEL", "warn");
    std::env::set_var("LEVELOG_TEST_BAD_LEVEL", "loud");
    std::env::set_var("LEVELOG_TEST_CONSOLE", "stdout");
    std::env::set_var("LEVELOG_TEST_BACKUPS", "7");
    std::env::set_var("LEVELOG_TEST_EMPTY_PATH", "");
    std::env::set_var("LEVELOG_TEST_PATH", "/var/log/app.log");

    let level: Level = env_or("LEVELOG_TEST_LEVEL", Level::INFO).into();
    assert_eq!(level, Level::WARN);
    let level: Level = env_or("LEVELOG_TEST_BAD_LEVEL", Level::INFO).into();
    assert_eq!(level, Level::INFO);
    let level: Level = env_or("LEVELOG_TEST_UNSET_LEVEL", Level::ERROR).into();
    assert_eq!(level, Level::ERROR);

    let console: ConsoleTarget = env_or("LEVELOG_TEST_CONSOLE", ConsoleTarget::Stderr).into();
    assert_eq!(console, ConsoleTarget::Stdout);
    let backups: usize = env_or("LEVELOG_TEST_BACKUPS", 100usize).into();
    assert_eq!(backups, 7);

    let path: PathBuf = env_or("LEVELOG_TEST_EMPTY_PATH", "/tmp/default.log").into();
    assert_eq!(path, PathBuf::from("/tmp/default.log"));
    let path: PathBuf = env_or("LEVELOG_TEST_PATH", "/tmp/default.log").into();
    assert_eq!(path, PathBuf::from("/var/log/app.log"));
    let s: String = env_or("LEVELOG_TEST_UNSET_STRING", "fallback").into();
    assert_eq!(s, "fallback");
}

#[test]
fn test_env_logger() {
    let path = test_dir("config_env").join("env.log");
    std::env::set_var("LEVELOG_TEST_ENV_FILE", &path);
    std::env::set_var("LEVELOG_TEST_ENV_LEVEL", "error");
    let builder = recipe::env_logger("LEVELOG_TEST_ENV_FILE", "LEVELOG_TEST_ENV_LEVEL");
    assert_eq!(builder.file_paths(), vec![path.as_path()]);
    assert_eq!(builder.get_min_level(), Level::ERROR);
    assert!(!builder.panic);

    std::env::set_var("LEVELOG_TEST_ENV_CONSOLE", "stdout");
    let builder = recipe::env_logger("LEVELOG_TEST_ENV_CONSOLE", "LEVELOG_TEST_ENV_NO_LEVEL");
    assert!(builder.file_paths().is_empty());
    assert_eq!(builder.get_min_level(), Level::INFO);

    let builder = recipe::env_logger("LEVELOG_TEST_ENV_UNSET", "LEVELOG_TEST_ENV_LEVEL");
    assert!(builder.file_paths().is_empty());
    assert_eq!(builder.get_min_level(), Level::ERROR);
}
