//! Log record model.
//!
//! # Responsibility
//! - Define the persisted application log record and its validation.
//! - Provide timestamp helpers shared by the store and the eviction sweep.
//!
//! # Invariants
//! - `id` is generated once and never reused for another log.
//! - `created_at` is set at construction and immutable afterwards.
//! - Write paths must call `Log::validate()` before persistence; a record
//!   with an unparsable timestamp never reaches storage through this crate.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a persisted log record.
pub type LogId = Uuid;

/// Severity of an application event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Storage form (`DEBUG`, `INFO`, `WARN`, `ERROR`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARN" => Some(Self::Warn),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failure raised before a log reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogValidationError {
    InvalidTimestamp(String),
}

impl Display for LogValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimestamp(value) => {
                write!(f, "log created_at `{value}` is not a valid RFC 3339 timestamp")
            }
        }
    }
}

impl Error for LogValidationError {}

/// One persisted application log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub id: LogId,
    /// RFC 3339, UTC, millisecond precision. Sorted as text, so the
    /// normalized form must stay lexicographically chronological.
    pub created_at: String,
    #[serde(rename = "log_level")]
    pub level: LogLevel,
    pub label: String,
    /// Free-form structured payload or a rendered error.
    pub details: Option<serde_json::Value>,
}

impl Log {
    /// Creates a log stamped with the current time and a fresh id.
    /// The label is trimmed at construction.
    pub fn new(
        level: LogLevel,
        label: impl Into<String>,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: now_rfc3339(),
            level,
            label: label.into().trim().to_string(),
            details,
        }
    }

    /// Checks construction-time invariants that the type system cannot.
    pub fn validate(&self) -> Result<(), LogValidationError> {
        if parse_timestamp_ms(&self.created_at).is_none() {
            return Err(LogValidationError::InvalidTimestamp(
                self.created_at.clone(),
            ));
        }
        Ok(())
    }

    /// Milliseconds elapsed from `created_at` to `now_ms`, or `None` when
    /// the timestamp does not parse. Negative for future timestamps.
    pub fn age_ms(&self, now_ms: i64) -> Option<i64> {
        parse_timestamp_ms(&self.created_at).map(|created| now_ms - created)
    }
}

/// Current time in the store's canonical timestamp form.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a stored timestamp to epoch milliseconds.
pub fn parse_timestamp_ms(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.timestamp_millis())
}
