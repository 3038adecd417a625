//! Setting record model.
//!
//! # Responsibility
//! - Define the closed set of recognized setting names and their values.
//! - Provide the compiled default for each setting.
//!
//! # Invariants
//! - `SettingId` doubles as the primary key in storage; there is exactly
//!   one record per recognized name once initialization has run.
//! - `SettingValue` is limited to bool, string, and number.

use crate::model::duration::RetentionPeriod;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Closed set of recognized setting names.
///
/// The display name is stored as the row key, so renaming a variant's
/// display name is a schema change, not a refactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingId {
    #[serde(rename = "User Email")]
    UserEmail,
    #[serde(rename = "Console Logs")]
    ConsoleLogs,
    #[serde(rename = "Info Popups")]
    InfoPopups,
    #[serde(rename = "Log Retention Duration")]
    LogRetentionDuration,
}

impl SettingId {
    /// Every recognized setting, in stable declaration order.
    pub const ALL: [SettingId; 4] = [
        SettingId::UserEmail,
        SettingId::ConsoleLogs,
        SettingId::InfoPopups,
        SettingId::LogRetentionDuration,
    ];

    /// Canonical display name, used as the storage key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserEmail => "User Email",
            Self::ConsoleLogs => "Console Logs",
            Self::InfoPopups => "Info Popups",
            Self::LogRetentionDuration => "Log Retention Duration",
        }
    }

    /// Parses a storage key back into a recognized setting name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "User Email" => Some(Self::UserEmail),
            "Console Logs" => Some(Self::ConsoleLogs),
            "Info Popups" => Some(Self::InfoPopups),
            "Log Retention Duration" => Some(Self::LogRetentionDuration),
            _ => None,
        }
    }

    /// Compiled default used when initialization finds the setting absent.
    pub fn default_value(self) -> SettingValue {
        match self {
            Self::UserEmail => SettingValue::Text(String::new()),
            Self::ConsoleLogs => SettingValue::Bool(true),
            Self::InfoPopups => SettingValue::Bool(true),
            Self::LogRetentionDuration => {
                SettingValue::Text(RetentionPeriod::SixMonths.as_str().to_string())
            }
        }
    }
}

impl Display for SettingId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value union for settings. Untagged so the persisted form stays plain
/// JSON (`true`, `"Six Months"`, `42.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }
}

/// One application-wide setting record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    /// Recognized name, used as the primary key.
    pub id: SettingId,
    pub value: SettingValue,
}

impl Setting {
    pub fn new(id: SettingId, value: SettingValue) -> Self {
        Self { id, value }
    }

    /// The setting populated with its compiled default.
    pub fn with_default(id: SettingId) -> Self {
        Self::new(id, id.default_value())
    }
}

#[cfg(test)]
mod tests {
    use super::{Setting, SettingId, SettingValue};

    #[test]
    fn ids_round_trip_through_storage_keys() {
        for id in SettingId::ALL {
            assert_eq!(SettingId::parse(id.as_str()), Some(id));
        }
        assert_eq!(SettingId::parse("Unknown Name"), None);
    }

    #[test]
    fn default_retention_is_a_recognized_period() {
        let setting = Setting::with_default(SettingId::LogRetentionDuration);
        let name = setting.value.as_text().expect("default must be text");
        assert!(crate::model::duration::RetentionPeriod::parse(name).is_some());
    }

    #[test]
    fn value_accessors_reject_other_variants() {
        assert_eq!(SettingValue::Bool(true).as_text(), None);
        assert_eq!(SettingValue::Text("x".into()).as_bool(), None);
        assert_eq!(SettingValue::Number(1.5).as_number(), Some(1.5));
    }
}
