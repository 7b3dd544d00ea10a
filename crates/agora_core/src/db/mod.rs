//! SQLite storage bootstrap, schema migrations and unit-of-work scopes.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the forum core.
//! - Apply schema migrations in deterministic order.
//! - Bound every action's persistence work in one transactional scope.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write forum data before migrations succeed.
//! - An uncommitted unit of work never leaves partial writes behind.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod unit_of_work;

pub use open::{open_db, open_db_in_memory};
pub use unit_of_work::{SqliteUnitOfWork, UnitOfWork};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// A numbered migration script failed; nothing from it was applied.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Migration { version, source } => {
                write!(f, "schema migration {version} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Migration { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
