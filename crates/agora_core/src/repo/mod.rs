//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per aggregate.
//! - Isolate SQL details from service/business orchestration.
//!
//! # Invariants
//! - Repositories never open or finish transactions; callers scope writes
//!   with a unit of work and hand repositories its connection.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use rusqlite::types::Value;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod activity_repo;
pub mod category_repo;
pub mod localization_repo;
pub mod member_repo;
pub mod role_repo;
pub mod settings_repo;
pub mod topic_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all forum repositories.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound {
        entity: &'static str,
        key: String,
    },
    /// Write rejected before reaching SQL.
    Validation(String),
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn not_found(entity: &'static str, key: impl Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::Validation(message) => write!(f, "invalid input: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::Validation(_) | Self::InvalidData(_) => None,
        }
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

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_flag(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

/// Builds `?, ?, ?` placeholders plus bind values for an `IN (...)` list.
pub(crate) fn uuid_in_list(ids: &[Uuid]) -> (String, Vec<Value>) {
    let placeholders = vec!["?"; ids.len()].join(", ");
    let values = ids.iter().map(|id| Value::Text(id.to_string())).collect();
    (placeholders, values)
}

pub(crate) fn row_exists(conn: &Connection, sql: &str, key: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(sql, [key], |row| row.get(0))?;
    Ok(exists == 1)
}
