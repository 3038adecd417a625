//! Setting repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed get/put/list access to the `settings` table.
//!
//! # Invariants
//! - `put` is an upsert by recognized name; settings are never deleted
//!   through this interface.
//! - Values are persisted as plain JSON text so the bool/string/number
//!   union survives round trips unchanged.

use crate::model::setting::{Setting, SettingId, SettingValue};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for setting records.
pub trait SettingRepository {
    fn get_setting(&self, id: SettingId) -> RepoResult<Option<Setting>>;
    /// Upserts by id, resolving concurrent writes last-write-wins.
    fn put_setting(&self, setting: &Setting) -> RepoResult<()>;
    /// All settings in stable id order.
    fn list_settings(&self) -> RepoResult<Vec<Setting>>;
}

/// SQLite-backed setting repository over a migrated connection.
pub struct SqliteSettingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SettingRepository for SqliteSettingRepository<'_> {
    fn get_setting(&self, id: SettingId) -> RepoResult<Option<Setting>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, value FROM settings WHERE id = ?1;",
                [id.as_str()],
                read_setting_row,
            )
            .optional()?;

        row.transpose()
    }

    fn put_setting(&self, setting: &Setting) -> RepoResult<()> {
        let value_json = encode_value(&setting.value)?;
        self.conn.execute(
            "INSERT INTO settings (id, value)
             VALUES (?1, ?2)
             ON CONFLICT (id) DO UPDATE SET value = excluded.value;",
            params![setting.id.as_str(), value_json],
        )?;
        Ok(())
    }

    fn list_settings(&self) -> RepoResult<Vec<Setting>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, value FROM settings ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut settings = Vec::new();

        while let Some(row) = rows.next()? {
            settings.push(read_setting_row(row)??);
        }

        Ok(settings)
    }
}

fn encode_value(value: &SettingValue) -> RepoResult<String> {
    serde_json::to_string(value)
        .map_err(|err| RepoError::InvalidData(format!("unencodable setting value: {err}")))
}

fn read_setting_row(row: &Row<'_>) -> rusqlite::Result<RepoResult<Setting>> {
    let id_text: String = row.get("id")?;
    let value_text: String = row.get("value")?;
    Ok(parse_setting(&id_text, &value_text))
}

fn parse_setting(id_text: &str, value_text: &str) -> RepoResult<Setting> {
    let id = SettingId::parse(id_text).ok_or_else(|| {
        RepoError::InvalidData(format!("unrecognized setting name `{id_text}` in settings.id"))
    })?;
    let value: SettingValue = serde_json::from_str(value_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "setting value `{value_text}` for `{id_text}` is not a bool, string, or number"
        ))
    })?;
    Ok(Setting::new(id, value))
}
