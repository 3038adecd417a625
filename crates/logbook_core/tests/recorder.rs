use logbook_core::{LocalStore, LogLevel, Recorder, Setting, SettingId, SettingValue};
use serde_json::json;

#[test]
fn debug_events_are_never_persisted() {
    let store = LocalStore::open_in_memory().unwrap();
    let recorder = Recorder::new(&store);

    recorder.debug("probe only", None);

    assert!(store.logs_desc().unwrap().is_empty());
}

#[test]
fn info_warn_error_are_persisted_with_their_level() {
    let store = LocalStore::open_in_memory().unwrap();
    let recorder = Recorder::new(&store);

    recorder.info("an info", None).unwrap();
    recorder.warn("a warning", None).unwrap();
    recorder.error("an error", None).unwrap();

    let logs = store.logs_desc().unwrap();
    assert_eq!(logs.len(), 3);

    let mut levels: Vec<LogLevel> = logs.iter().map(|log| log.level).collect();
    levels.sort_by_key(|level| level.as_str());
    assert_eq!(levels, [LogLevel::Error, LogLevel::Info, LogLevel::Warn]);
}

#[test]
fn recorded_event_matches_the_stored_record() {
    let store = LocalStore::open_in_memory().unwrap();
    let recorder = Recorder::new(&store);

    let recorded = recorder
        .error("sync failed", Some(json!({ "attempt": 3 })))
        .unwrap();

    let stored = store.get_log(recorded.id).unwrap().unwrap();
    assert_eq!(stored, recorded);
}

#[test]
fn labels_are_trimmed_before_persistence() {
    let store = LocalStore::open_in_memory().unwrap();
    let recorder = Recorder::new(&store);

    let recorded = recorder.info("  padded  ", None).unwrap();
    assert_eq!(recorded.label, "padded");
}

#[test]
fn recording_works_with_console_mirroring_disabled() {
    let store = LocalStore::open_in_memory().unwrap();
    store
        .put_setting(&Setting::new(
            SettingId::ConsoleLogs,
            SettingValue::Bool(false),
        ))
        .unwrap();

    let recorder = Recorder::new(&store);
    recorder.warn("still persisted", None).unwrap();

    assert_eq!(store.logs_desc().unwrap().len(), 1);
}

#[test]
fn recorded_events_reach_live_subscribers() {
    let store = LocalStore::open_in_memory().unwrap();
    let live = store.live_logs().unwrap();
    live.recv_timeout(std::time::Duration::from_secs(2)).unwrap();

    let recorder = Recorder::new(&store);
    let recorded = recorder.info("observed", None).unwrap();

    let snapshot = live.recv_timeout(std::time::Duration::from_secs(2)).unwrap();
    assert_eq!(snapshot[0].id, recorded.id);
}
