//! Application event recorder.
//!
//! # Responsibility
//! - Turn application events into persisted `Log` records.
//! - Mirror recorded events into the process diagnostic log.
//!
//! # Invariants
//! - DEBUG events are never persisted; they only reach diagnostics.
//! - INFO/WARN/ERROR events are persisted before the call returns, so a
//!   live logs subscriber sees them immediately.
//! - Storage failures propagate; a record is never dropped silently.

use crate::model::log::{Log, LogLevel};
use crate::model::setting::SettingId;
use crate::repo::RepoResult;
use crate::store::LocalStore;
use log::{debug, error, info, warn};

/// Records application events against a shared store.
pub struct Recorder<'store> {
    store: &'store LocalStore,
}

impl<'store> Recorder<'store> {
    pub fn new(store: &'store LocalStore) -> Self {
        Self { store }
    }

    /// Diagnostics-only event; nothing is persisted.
    pub fn debug(&self, label: &str, details: Option<serde_json::Value>) {
        debug!("event=app_log level=DEBUG label={label} details={}", render(&details));
    }

    /// Persists an INFO event and returns the stored record.
    pub fn info(&self, label: &str, details: Option<serde_json::Value>) -> RepoResult<Log> {
        self.record(LogLevel::Info, label, details)
    }

    /// Persists a WARN event and returns the stored record.
    pub fn warn(&self, label: &str, details: Option<serde_json::Value>) -> RepoResult<Log> {
        self.record(LogLevel::Warn, label, details)
    }

    /// Persists an ERROR event and returns the stored record.
    pub fn error(&self, label: &str, details: Option<serde_json::Value>) -> RepoResult<Log> {
        self.record(LogLevel::Error, label, details)
    }

    fn record(
        &self,
        level: LogLevel,
        label: &str,
        details: Option<serde_json::Value>,
    ) -> RepoResult<Log> {
        let log = Log::new(level, label, details);
        self.store.put_log(&log)?;

        if self.console_mirror_enabled() {
            let line = format!(
                "event=app_log level={} label={} details={}",
                log.level,
                log.label,
                render(&log.details)
            );
            match level {
                LogLevel::Debug | LogLevel::Info => info!("{line}"),
                LogLevel::Warn => warn!("{line}"),
                LogLevel::Error => error!("{line}"),
            }
        }

        Ok(log)
    }

    /// The `Console Logs` setting gates mirroring; an absent or unreadable
    /// setting counts as enabled so diagnostics fail open.
    fn console_mirror_enabled(&self) -> bool {
        match self.store.get_setting(SettingId::ConsoleLogs) {
            Ok(Some(setting)) => setting.value.as_bool().unwrap_or(true),
            Ok(None) | Err(_) => true,
        }
    }
}

fn render(details: &Option<serde_json::Value>) -> String {
    details
        .as_ref()
        .map_or_else(|| "none".to_string(), ToString::to_string)
}
