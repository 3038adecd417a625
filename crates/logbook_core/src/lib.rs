//! Local data core for the Logbook application.
//! This crate is the single source of truth for the embedded store and its
//! startup routines; UI layers consume it and never touch storage directly.

pub mod db;
pub mod live;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use live::{LiveQuery, TableWatch};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::backup::Backup;
pub use model::duration::RetentionPeriod;
pub use model::log::{Log, LogId, LogLevel, LogValidationError};
pub use model::setting::{Setting, SettingId, SettingValue};
pub use repo::log_repo::{LogRepository, SqliteLogRepository};
pub use repo::setting_repo::{SettingRepository, SqliteSettingRepository};
pub use repo::{RepoError, RepoResult};
pub use service::recorder::Recorder;
pub use store::LocalStore;

/// Title used for exports and diagnostics.
pub const APP_TITLE: &str = "Logbook";

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
