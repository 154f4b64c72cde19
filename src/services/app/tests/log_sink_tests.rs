use super::*;

#[test]
fn test_collecting_sink_keeps_order_and_levels() {
    let sink = CollectingSink::new();
    sink.info("first");
    sink.warn("second");
    sink.error("third");

    let lines = sink.lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], (Level::Info, "first".to_string()));
    assert_eq!(lines[1], (Level::Warn, "second".to_string()));
    assert_eq!(lines[2], (Level::Error, "third".to_string()));
}

#[test]
fn test_collecting_sink_filters_by_level() {
    let sink = CollectingSink::new();
    sink.info("a");
    sink.warn("b");
    sink.warn("c");

    assert_eq!(sink.messages_at(Level::Warn), vec!["b", "c"]);
    assert!(sink.messages_at(Level::Error).is_empty());
}

#[test]
fn test_silent_and_log_crate_sinks_accept_messages() {
    let _ = env_logger::builder().is_test(true).try_init();

    SilentSink.error("ignored");
    LogCrateSink::default().info("routed through log facade");
}
