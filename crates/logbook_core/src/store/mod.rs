//! The local store facade.
//!
//! # Responsibility
//! - Own the storage connection and the per-table observer registries.
//! - Route every mutation through one place so committed writes publish a
//!   fresh snapshot to live observers.
//! - Provide the startup routines: settings initialization and the log
//!   retention sweep.
//!
//! # Invariants
//! - Constructed explicitly and shared by reference; there is no implicit
//!   process-wide global.
//! - Each logical operation is atomic: it is serialized on the internal
//!   connection lock, and multi-row mutations run inside one transaction.
//! - Live emissions reflect a state at least as new as the most recently
//!   committed write.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::live::{LiveQuery, TableWatch};
use crate::model::backup::Backup;
use crate::model::duration::RetentionPeriod;
use crate::model::log::{now_rfc3339, Log, LogId};
use crate::model::setting::{Setting, SettingId};
use crate::repo::log_repo::{LogRepository, SqliteLogRepository};
use crate::repo::setting_repo::{SettingRepository, SqliteSettingRepository};
use crate::repo::RepoResult;
use chrono::Utc;
use log::{info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Durable keyed store for the application's settings and logs.
///
/// Open one instance at process start and hand `&LocalStore` to every
/// component that needs it; the internal lock makes that safe without any
/// external coordination.
pub struct LocalStore {
    conn: Mutex<Connection>,
    logs_watch: TableWatch<Log>,
    settings_watch: TableWatch<Setting>,
}

impl LocalStore {
    /// Opens (or creates) the store file and applies pending migrations.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens an in-memory store, mainly for tests and probes.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already-migrated connection, e.g. one produced by
    /// [`crate::db::open_db`].
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            logs_watch: TableWatch::new(),
            settings_watch: TableWatch::new(),
        }
    }

    //
    // Settings table
    //

    pub fn get_setting(&self, id: SettingId) -> RepoResult<Option<Setting>> {
        let conn = self.lock_conn();
        SqliteSettingRepository::new(&conn).get_setting(id)
    }

    /// Upserts one setting and publishes a settings snapshot.
    pub fn put_setting(&self, setting: &Setting) -> RepoResult<()> {
        let conn = self.lock_conn();
        SqliteSettingRepository::new(&conn).put_setting(setting)?;
        self.publish_settings(&conn)
    }

    /// All settings in stable id order.
    pub fn settings(&self) -> RepoResult<Vec<Setting>> {
        let conn = self.lock_conn();
        SqliteSettingRepository::new(&conn).list_settings()
    }

    //
    // Logs table
    //

    pub fn get_log(&self, id: LogId) -> RepoResult<Option<Log>> {
        let conn = self.lock_conn();
        SqliteLogRepository::new(&conn).get_log(id)
    }

    /// Validates, upserts one log, and publishes a logs snapshot.
    pub fn put_log(&self, log: &Log) -> RepoResult<()> {
        let conn = self.lock_conn();
        SqliteLogRepository::new(&conn).put_log(log)?;
        self.publish_logs(&conn)
    }

    /// All logs, newest first.
    pub fn logs_desc(&self) -> RepoResult<Vec<Log>> {
        let conn = self.lock_conn();
        SqliteLogRepository::new(&conn).list_logs_desc()
    }

    /// Deletes the given logs in one transaction, publishes a logs
    /// snapshot, and returns how many rows were removed.
    pub fn bulk_delete_logs(&self, ids: &[LogId]) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut conn = self.lock_conn();
        let tx = conn.transaction()?;
        let removed = SqliteLogRepository::new(&tx).bulk_delete_logs(ids)?;
        tx.commit()?;

        self.publish_logs(&conn)?;
        Ok(removed)
    }

    //
    // Startup routines
    //

    /// Seeds every recognized setting that is absent with its compiled
    /// default, leaving existing records untouched.
    ///
    /// Idempotent: once all settings exist, repeated calls change nothing
    /// and publish nothing. Runs in one transaction, so a storage failure
    /// leaves no partially-seeded table behind.
    pub fn initialize_settings(&self) -> RepoResult<()> {
        let mut conn = self.lock_conn();
        let mut created = 0;

        let tx = conn.transaction()?;
        {
            let repo = SqliteSettingRepository::new(&tx);
            for id in SettingId::ALL {
                if repo.get_setting(id)?.is_none() {
                    repo.put_setting(&Setting::with_default(id))?;
                    created += 1;
                }
            }
        }
        tx.commit()?;

        info!("event=settings_init module=store status=ok created={created}");

        if created > 0 {
            self.publish_settings(&conn)?;
        }
        Ok(())
    }

    /// Removes all logs older than the configured retention window and
    /// returns how many were removed.
    ///
    /// Recoverable conditions that end the sweep early with `0`:
    /// - the retention setting is absent, non-text, or not a recognized
    ///   period name;
    /// - the resolved magnitude is the "do not evict" sentinel.
    ///
    /// Logs whose `created_at` does not parse are skipped (kept), never
    /// evicted. The sweep is idempotent: a second run with no new logs
    /// removes nothing.
    pub fn delete_expired_logs(&self) -> RepoResult<usize> {
        let mut conn = self.lock_conn();

        let retention = SqliteSettingRepository::new(&conn)
            .get_setting(SettingId::LogRetentionDuration)?
            .and_then(|setting| {
                setting
                    .value
                    .as_text()
                    .and_then(RetentionPeriod::parse)
            });

        let Some(period) = retention else {
            warn!("event=log_retention module=store status=skipped reason=unrecognized_setting");
            return Ok(0);
        };

        let magnitude_ms = period.as_millis();
        if RetentionPeriod::suppresses_eviction(magnitude_ms) {
            info!("event=log_retention module=store status=ok removed=0 reason=forever");
            return Ok(0);
        }

        let logs = SqliteLogRepository::new(&conn).list_logs_desc()?;
        let expired = expired_log_ids(&logs, magnitude_ms, Utc::now().timestamp_millis());

        if expired.is_empty() {
            info!("event=log_retention module=store status=ok removed=0");
            return Ok(0);
        }

        let tx = conn.transaction()?;
        let removed = SqliteLogRepository::new(&tx).bulk_delete_logs(&expired)?;
        tx.commit()?;

        info!(
            "event=log_retention module=store status=ok removed={removed} period={}",
            period.as_str()
        );

        self.publish_logs(&conn)?;
        Ok(removed)
    }

    //
    // Live queries
    //

    /// Subscribes to the logs table. The first emission is the current
    /// newest-first snapshot; each committed write to the table emits a
    /// fresh one until the handle is dropped.
    pub fn live_logs(&self) -> RepoResult<LiveQuery<Log>> {
        let conn = self.lock_conn();
        let snapshot = SqliteLogRepository::new(&conn).list_logs_desc()?;
        Ok(self.logs_watch.subscribe(snapshot))
    }

    /// Subscribes to the settings table; same contract as [`Self::live_logs`]
    /// with a stable id order.
    pub fn live_settings(&self) -> RepoResult<LiveQuery<Setting>> {
        let conn = self.lock_conn();
        let snapshot = SqliteSettingRepository::new(&conn).list_settings()?;
        Ok(self.settings_watch.subscribe(snapshot))
    }

    //
    // Backup
    //

    /// Reads both tables into an exportable structure stamped with the
    /// current time. Read-only; observers see no emission.
    pub fn export_backup(&self, app_title: impl Into<String>) -> RepoResult<Backup> {
        let conn = self.lock_conn();
        Ok(Backup {
            app_title: app_title.into(),
            created_at: now_rfc3339(),
            logs: SqliteLogRepository::new(&conn).list_logs_desc()?,
            settings: SqliteSettingRepository::new(&conn).list_settings()?,
        })
    }

    fn publish_logs(&self, conn: &Connection) -> RepoResult<()> {
        if self.logs_watch.observer_count() == 0 {
            return Ok(());
        }
        let snapshot = SqliteLogRepository::new(conn).list_logs_desc()?;
        self.logs_watch.publish(&snapshot);
        Ok(())
    }

    fn publish_settings(&self, conn: &Connection) -> RepoResult<()> {
        if self.settings_watch.observer_count() == 0 {
            return Ok(());
        }
        let snapshot = SqliteSettingRepository::new(conn).list_settings()?;
        self.settings_watch.publish(&snapshot);
        Ok(())
    }

    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock means another caller panicked mid-operation; the
        // connection itself is still usable, so recover the guard.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Ids of logs whose age strictly exceeds the retention magnitude.
///
/// Unparsable timestamps yield no age and are skipped; future timestamps
/// have a negative age and are never eligible.
fn expired_log_ids(logs: &[Log], magnitude_ms: i64, now_ms: i64) -> Vec<LogId> {
    logs.iter()
        .filter(|log| matches!(log.age_ms(now_ms), Some(age) if age > magnitude_ms))
        .map(|log| log.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::expired_log_ids;
    use crate::model::log::{parse_timestamp_ms, Log, LogLevel};

    fn log_aged(now_ms: i64, age_ms: i64) -> Log {
        let mut log = Log::new(LogLevel::Info, "aged", None);
        log.created_at = chrono::DateTime::from_timestamp_millis(now_ms - age_ms)
            .unwrap()
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        log
    }

    #[test]
    fn only_logs_strictly_past_the_window_are_eligible() {
        let now_ms = parse_timestamp_ms("2024-09-01T12:00:00.000Z").unwrap();
        let fresh = log_aged(now_ms, 10);
        let recent = log_aged(now_ms, 2_000);
        let stale = log_aged(now_ms, 100_000);

        let expired = expired_log_ids(&[fresh, recent, stale.clone()], 5_000, now_ms);
        assert_eq!(expired, vec![stale.id]);
    }

    #[test]
    fn boundary_age_is_retained() {
        let now_ms = parse_timestamp_ms("2024-09-01T12:00:00.000Z").unwrap();
        let boundary = log_aged(now_ms, 5_000);
        assert!(expired_log_ids(&[boundary], 5_000, now_ms).is_empty());
    }

    #[test]
    fn unparsable_and_future_timestamps_are_retained() {
        let now_ms = parse_timestamp_ms("2024-09-01T12:00:00.000Z").unwrap();
        let mut garbled = log_aged(now_ms, 100_000);
        garbled.created_at = "not-a-timestamp".to_string();
        let future = log_aged(now_ms, -3_600_000);

        assert!(expired_log_ids(&[garbled, future], 1, now_ms).is_empty());
    }
}
