//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-table data access contracts (`settings`, `logs`).
//! - Isolate SQLite query details from the store facade.
//!
//! # Invariants
//! - Log writes must enforce `Log::validate()` before persistence.
//! - Read paths reject invalid persisted state (`InvalidData`) instead of
//!   masking it.

use crate::db::DbError;
use crate::model::log::LogValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod log_repo;
pub mod setting_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by the settings and logs tables.
#[derive(Debug)]
pub enum RepoError {
    Validation(LogValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<LogValidationError> for RepoError {
    fn from(value: LogValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
