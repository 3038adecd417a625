use logbook_core::model::log::parse_timestamp_ms;
use logbook_core::{LocalStore, Log, LogLevel, APP_TITLE};

#[test]
fn export_bundles_both_tables_with_title_and_timestamp() {
    let store = LocalStore::open_in_memory().unwrap();
    store.initialize_settings().unwrap();
    store.put_log(&Log::new(LogLevel::Info, "kept for export", None)).unwrap();

    let backup = store.export_backup(APP_TITLE).unwrap();

    assert_eq!(backup.app_title, APP_TITLE);
    assert!(parse_timestamp_ms(&backup.created_at).is_some());
    assert_eq!(backup.logs.len(), 1);
    assert_eq!(backup.settings.len(), store.settings().unwrap().len());
}

#[test]
fn export_orders_logs_newest_first() {
    let store = LocalStore::open_in_memory().unwrap();

    let mut older = Log::new(LogLevel::Info, "older", None);
    older.created_at = "2024-09-01T10:00:00.000Z".to_string();
    let mut newer = Log::new(LogLevel::Info, "newer", None);
    newer.created_at = "2024-09-01T11:00:00.000Z".to_string();

    store.put_log(&older).unwrap();
    store.put_log(&newer).unwrap();

    let backup = store.export_backup(APP_TITLE).unwrap();
    assert_eq!(backup.logs[0].id, newer.id);
    assert_eq!(backup.logs[1].id, older.id);
}

#[test]
fn export_serializes_to_json_and_back() {
    let store = LocalStore::open_in_memory().unwrap();
    store.initialize_settings().unwrap();
    store
        .put_log(&Log::new(
            LogLevel::Error,
            "boom",
            Some(serde_json::json!({ "cause": "disk full" })),
        ))
        .unwrap();

    let backup = store.export_backup(APP_TITLE).unwrap();
    let json = serde_json::to_string(&backup).unwrap();
    let restored: logbook_core::Backup = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, backup);
}
