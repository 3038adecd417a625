use chrono::{Duration, SecondsFormat, Utc};
use logbook_core::db::open_db_in_memory;
use logbook_core::{LocalStore, Log, LogLevel, RetentionPeriod, Setting, SettingId, SettingValue};

fn retention_setting(name: &str) -> Setting {
    Setting::new(
        SettingId::LogRetentionDuration,
        SettingValue::Text(name.to_string()),
    )
}

fn log_aged_ms(label: &str, age_ms: i64) -> Log {
    let mut log = Log::new(LogLevel::Info, label, None);
    log.created_at = (Utc::now() - Duration::milliseconds(age_ms))
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    log
}

#[test]
fn removes_exactly_the_logs_past_the_retention_window() {
    let store = LocalStore::open_in_memory().unwrap();
    store
        .put_setting(&retention_setting(RetentionPeriod::OneMinute.as_str()))
        .unwrap();

    let fresh = log_aged_ms("fresh", 10);
    let recent = log_aged_ms("recent", 2_000);
    let stale = log_aged_ms("stale", 100_000);
    for log in [&fresh, &recent, &stale] {
        store.put_log(log).unwrap();
    }

    let removed = store.delete_expired_logs().unwrap();
    assert_eq!(removed, 1);

    let remaining: Vec<_> = store
        .logs_desc()
        .unwrap()
        .into_iter()
        .map(|log| log.id)
        .collect();
    assert!(remaining.contains(&fresh.id));
    assert!(remaining.contains(&recent.id));
    assert!(!remaining.contains(&stale.id));
}

#[test]
fn sweep_is_idempotent() {
    let store = LocalStore::open_in_memory().unwrap();
    store
        .put_setting(&retention_setting(RetentionPeriod::OneSecond.as_str()))
        .unwrap();

    store.put_log(&log_aged_ms("old", 60_000)).unwrap();

    assert_eq!(store.delete_expired_logs().unwrap(), 1);
    assert_eq!(store.delete_expired_logs().unwrap(), 0);
}

#[test]
fn forever_retains_everything_regardless_of_age() {
    let store = LocalStore::open_in_memory().unwrap();
    store
        .put_setting(&retention_setting(RetentionPeriod::Forever.as_str()))
        .unwrap();

    store.put_log(&log_aged_ms("ancient", 10 * 365 * 86_400_000)).unwrap();

    assert_eq!(store.delete_expired_logs().unwrap(), 0);
    assert_eq!(store.logs_desc().unwrap().len(), 1);
}

#[test]
fn all_time_scans_but_removes_nothing() {
    let store = LocalStore::open_in_memory().unwrap();
    store
        .put_setting(&retention_setting(RetentionPeriod::AllTime.as_str()))
        .unwrap();

    store.put_log(&log_aged_ms("ancient", 10 * 365 * 86_400_000)).unwrap();

    assert_eq!(store.delete_expired_logs().unwrap(), 0);
    assert_eq!(store.logs_desc().unwrap().len(), 1);
}

#[test]
fn missing_retention_setting_skips_the_sweep() {
    let store = LocalStore::open_in_memory().unwrap();
    store.put_log(&log_aged_ms("old", 100_000)).unwrap();

    assert_eq!(store.delete_expired_logs().unwrap(), 0);
    assert_eq!(store.logs_desc().unwrap().len(), 1);
}

#[test]
fn unrecognized_duration_name_skips_the_sweep() {
    let store = LocalStore::open_in_memory().unwrap();
    store.put_setting(&retention_setting("Fortnight")).unwrap();
    store.put_log(&log_aged_ms("old", 100_000)).unwrap();

    assert_eq!(store.delete_expired_logs().unwrap(), 0);
    assert_eq!(store.logs_desc().unwrap().len(), 1);
}

#[test]
fn non_text_retention_value_skips_the_sweep() {
    let store = LocalStore::open_in_memory().unwrap();
    store
        .put_setting(&Setting::new(
            SettingId::LogRetentionDuration,
            SettingValue::Bool(true),
        ))
        .unwrap();
    store.put_log(&log_aged_ms("old", 100_000)).unwrap();

    assert_eq!(store.delete_expired_logs().unwrap(), 0);
}

#[test]
fn malformed_timestamp_is_never_evicted() {
    // A malformed row can only exist via an out-of-band write, so seed it
    // through the raw connection before wrapping the store.
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO logs (id, created_at, level, label, details)
         VALUES (?1, ?2, ?3, ?4, NULL);",
        rusqlite::params![
            uuid::Uuid::new_v4().to_string(),
            "not-a-timestamp",
            "INFO",
            "legacy row",
        ],
    )
    .unwrap();

    let store = LocalStore::from_connection(conn);
    store
        .put_setting(&retention_setting(RetentionPeriod::Now.as_str()))
        .unwrap();

    assert_eq!(store.delete_expired_logs().unwrap(), 0);

    let remaining = store.logs_desc().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].created_at, "not-a-timestamp");
}

#[test]
fn future_timestamp_is_retained() {
    let store = LocalStore::open_in_memory().unwrap();
    store
        .put_setting(&retention_setting(RetentionPeriod::Now.as_str()))
        .unwrap();

    store.put_log(&log_aged_ms("from the future", -3_600_000)).unwrap();

    assert_eq!(store.delete_expired_logs().unwrap(), 0);
    assert_eq!(store.logs_desc().unwrap().len(), 1);
}

#[test]
fn default_retention_setting_resolves_to_a_real_period() {
    let store = LocalStore::open_in_memory().unwrap();
    store.initialize_settings().unwrap();

    // A freshly initialized store sweeps without touching young logs.
    store.put_log(&log_aged_ms("young", 1_000)).unwrap();
    assert_eq!(store.delete_expired_logs().unwrap(), 0);
}
