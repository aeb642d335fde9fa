use super::utils::*;
use crate::*;
use rstest::*;
use std::sync::Arc;

fn log_all(logger: &Logger) {
    logger.debug().print("debug").unwrap();
    logger.info().print("info").unwrap();
    logger.warn().print("warn").unwrap();
    logger.error().print("error").unwrap();
}

#[test]
fn test_simple_sampler_matrix() {
    let sampler = Arc::new(SimpleSampler::new(Level::INFO));
    sampler.add_named_level("root", Level::ERROR);
    sampler.add_named_level("root.child1.*", Level::WARN);

    let (root, mem) = mem_logger("root");
    let root = root.with_shared_sampler(sampler.clone());
    let child1 = root.child("child1");
    let child2 = child1.child("child2");
    assert_eq!(child2.name(), "root.child1.child2");

    log_all(&root);
    log_all(&child1);
    log_all(&child2);

    let got: Vec<(String, String)> = mem
        .json_lines()
        .iter()
        .map(|v| (v["logger"].as_str().unwrap().to_string(), v["msg"].as_str().unwrap().to_string()))
        .collect();
    let expected = [
        ("root", "error"),
        ("root.child1", "info"),
        ("root.child1", "warn"),
        ("root.child1", "error"),
        ("root.child1.child2", "warn"),
        ("root.child1.child2", "error"),
    ];
    let expected: Vec<(String, String)> =
        expected.iter().map(|(n, m)| (n.to_string(), m.to_string())).collect();
    assert_eq!(got, expected);
}

#[rstest]
#[case("app", Level::INFO, true)]
#[case("app", Level::DEBUG, false)]
#[case("app.db", Level::INFO, true)]
#[case("app.db.pool", Level::INFO, false)]
#[case("app.db.pool", Level::ERROR, true)]
#[case("app.dbx", Level::INFO, true)]
#[case("quiet", Level::FATAL, false)]
fn test_simple_sampler_patterns(#[case] name: &str, #[case] level: Level, #[case] allow: bool) {
    let sampler = SimpleSampler::new(Level::INFO);
    sampler.add_named_level("app.db.*", Level::ERROR);
    sampler.add_named_level("quiet", Level::DISABLED);
    assert_eq!(sampler.sample(name, level), allow);
}

#[test]
fn test_simple_sampler_update() {
    let sampler = SimpleSampler::new(Level::WARN);
    assert_eq!(sampler.default_level(), Level::WARN);
    sampler.add_named_level("a.*", Level::ERROR);
    // the first registered pattern wins, an existing one is not overwritten
    sampler.add_named_level("a.b", Level::TRACE);
    sampler.add_named_level("a.*", Level::TRACE);
    assert!(!sampler.sample("a.b", Level::WARN));
    assert_eq!(sampler.named_levels().get("a.*"), Some(&Level::ERROR));

    sampler.del_name("a.*");
    assert!(sampler.sample("a.b", Level::TRACE));
    assert!(!sampler.sample("a.c", Level::INFO));

    sampler.set_default_level(Level::INFO);
    assert!(sampler.sample("a.c", Level::INFO));

    sampler.reset_named_levels([("x", Level::ERROR), ("y.*", Level::WARN)]);
    let names = sampler.named_levels();
    assert_eq!(names.len(), 2);
    assert!(!names.contains_key("a.b"));
    assert!(!sampler.sample("x", Level::WARN));
    assert!(sampler.sample("y.z", Level::WARN));
}

#[test]
fn test_switch_sampler() {
    let first = SimpleSampler::new(Level::INFO);
    first.add_named_level("root", Level::WARN);
    let switch = Arc::new(SwitchSampler::new(Arc::new(first)));

    let (root, mem) = mem_logger("root");
    let root = root.with_shared_sampler(switch.clone());
    root.debug().print("msg1").unwrap();
    root.info().print("msg2").unwrap();
    root.warn().print("msg3").unwrap();
    root.error().print("msg4").unwrap();

    let second = SimpleSampler::new(Level::INFO);
    second.add_named_level("root", Level::ERROR);
    switch.set(Arc::new(second));
    root.debug().print("msg5").unwrap();
    root.info().print("msg6").unwrap();
    root.warn().print("msg7").unwrap();
    root.error().print("msg8").unwrap();

    assert_eq!(mem.messages(), vec!["msg3", "msg4", "msg8"]);
}

#[test]
fn test_closure_sampler_and_switch_off() {
    let (logger, mem) = mem_logger("svc");
    let logger = logger.with_sampler(|name: &str, level: Level| name == "svc" && level >= Level::WARN);
    assert!(!logger.enabled(Level::INFO));
    assert!(logger.enabled(Level::WARN));
    assert!(!logger.child("sub").enabled(Level::ERROR));

    logger.global_state().disable_sampling(true);
    assert!(logger.enabled(Level::INFO));
    // the level threshold still applies
    assert!(!logger.enabled(Level::TRACE));
    logger.info().print("sampling off").unwrap();
    logger.global_state().disable_sampling(false);
    logger.info().print("dropped").unwrap();

    assert_eq!(mem.messages(), vec!["sampling off"]);
    assert!(!logger.without_sampler().child("sub").enabled(Level::TRACE));
    assert!(logger.without_sampler().child("sub").enabled(Level::DEBUG));
}
