//! Action entry points used by front ends.
//!
//! # Responsibility
//! - Expose one function per admin or public action.
//! - Scope each action in its own unit of work and convert domain results
//!   into response values (CSV files, JSON envelopes, XML documents, view
//!   models).
//!
//! # Invariants
//! - Import actions never return `Err`; failures are reported in-band.
//! - Read-only actions release their unit of work without committing.

use crate::db::DbError;
use crate::repo::RepoError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod admin;
pub mod home;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    Db(DbError),
    Repo(RepoError),
    /// Requested viewing role is not stored.
    RoleNotFound(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::RoleNotFound(name) => write!(f, "role not found: {name}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::RoleNotFound(_) => None,
        }
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// CSV download; without a file name the body is shown inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvFileResult {
    pub file_download_name: Option<String>,
    pub body: String,
}

/// XML document plus response hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlResult {
    pub content_type: &'static str,
    pub body: String,
    /// Seconds a cache may serve this document.
    pub cache_max_age_secs: u32,
}
