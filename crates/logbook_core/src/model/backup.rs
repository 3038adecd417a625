//! Exportable snapshot of the whole local store.

use crate::model::log::Log;
use crate::model::setting::Setting;
use serde::{Deserialize, Serialize};

/// Full-store export consumed by the backup/restore collaborator.
///
/// Logs are ordered newest-first, matching the live view they were read
/// from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    pub app_title: String,
    /// Export timestamp in the store's canonical RFC 3339 form.
    pub created_at: String,
    pub logs: Vec<Log>,
    pub settings: Vec<Setting>,
}
