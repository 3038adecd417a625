//! Log repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed get/put/scan/bulk-delete access to the `logs` table.
//!
//! # Invariants
//! - `put` validates the record before any SQL mutation.
//! - Descending scans order by `created_at` (index-backed) with `id` as a
//!   stable tie-break.
//! - `bulk_delete` is the only deletion path for logs.

use crate::model::log::{Log, LogId, LogLevel};
use crate::repo::{RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

const LOG_SELECT_SQL: &str = "SELECT id, created_at, level, label, details FROM logs";

// Keeps one DELETE statement well under SQLite's bind-parameter ceiling.
const BULK_DELETE_CHUNK: usize = 500;

/// Repository interface for log records.
pub trait LogRepository {
    fn get_log(&self, id: LogId) -> RepoResult<Option<Log>>;
    /// Upserts by id, resolving concurrent writes last-write-wins.
    fn put_log(&self, log: &Log) -> RepoResult<()>;
    /// All logs, newest first.
    fn list_logs_desc(&self) -> RepoResult<Vec<Log>>;
    /// Deletes the given ids and returns how many rows were removed.
    /// Absent ids are ignored. Callers wanting atomicity across the whole
    /// set run this inside a transaction.
    fn bulk_delete_logs(&self, ids: &[LogId]) -> RepoResult<usize>;
}

/// SQLite-backed log repository over a migrated connection.
pub struct SqliteLogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLogRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl LogRepository for SqliteLogRepository<'_> {
    fn get_log(&self, id: LogId) -> RepoResult<Option<Log>> {
        let row = self
            .conn
            .query_row(
                &format!("{LOG_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                read_log_row,
            )
            .optional()?;

        row.transpose()
    }

    fn put_log(&self, log: &Log) -> RepoResult<()> {
        log.validate()?;

        let details_json = log
            .details
            .as_ref()
            .map(|details| {
                serde_json::to_string(details).map_err(|err| {
                    RepoError::InvalidData(format!("unencodable log details: {err}"))
                })
            })
            .transpose()?;

        self.conn.execute(
            "INSERT INTO logs (id, created_at, level, label, details)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (id) DO UPDATE SET
                created_at = excluded.created_at,
                level = excluded.level,
                label = excluded.label,
                details = excluded.details;",
            params![
                log.id.to_string(),
                log.created_at,
                log.level.as_str(),
                log.label,
                details_json,
            ],
        )?;

        Ok(())
    }

    fn list_logs_desc(&self) -> RepoResult<Vec<Log>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LOG_SELECT_SQL} ORDER BY created_at DESC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut logs = Vec::new();

        while let Some(row) = rows.next()? {
            logs.push(read_log_row(row)??);
        }

        Ok(logs)
    }

    fn bulk_delete_logs(&self, ids: &[LogId]) -> RepoResult<usize> {
        let mut removed = 0;

        for chunk in ids.chunks(BULK_DELETE_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let bind_values = chunk
                .iter()
                .map(|id| Value::Text(id.to_string()))
                .collect::<Vec<_>>();

            removed += self.conn.execute(
                &format!("DELETE FROM logs WHERE id IN ({placeholders});"),
                params_from_iter(bind_values),
            )?;
        }

        Ok(removed)
    }
}

fn read_log_row(row: &Row<'_>) -> rusqlite::Result<RepoResult<Log>> {
    let id_text: String = row.get("id")?;
    let created_at: String = row.get("created_at")?;
    let level_text: String = row.get("level")?;
    let label: String = row.get("label")?;
    let details_text: Option<String> = row.get("details")?;

    Ok(parse_log(id_text, created_at, level_text, label, details_text))
}

fn parse_log(
    id_text: String,
    created_at: String,
    level_text: String,
    label: String,
    details_text: Option<String>,
) -> RepoResult<Log> {
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in logs.id"))
    })?;
    let level = LogLevel::parse(&level_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid log level `{level_text}` in logs.level"))
    })?;
    let details = details_text
        .map(|text| {
            serde_json::from_str(&text).map_err(|_| {
                RepoError::InvalidData(format!("invalid JSON `{text}` in logs.details"))
            })
        })
        .transpose()?;

    // A malformed created_at is deliberately readable: the eviction sweep
    // must be able to see such rows to skip them instead of destroying them.
    Ok(Log {
        id,
        created_at,
        level,
        label,
        details,
    })
}
