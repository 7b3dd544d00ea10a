//! Upload-to-report import orchestration.
//!
//! # Responsibility
//! - Reject absent or empty uploads before any parsing.
//! - Decode and split the upload, run one domain parser inside the caller's
//!   unit of work, and settle that unit of work exactly once.
//! - Fold parser and commit failures into the returned report.
//!
//! # Invariants
//! - Every path returns a report; no failure escapes as an error.
//! - A unit of work is either committed once or rolled back once.
//! - A parser failure discards the parser's partial report and rolls back
//!   every row of the file.

use crate::csv_text::{decode_upload, split_lines};
use crate::db::UnitOfWork;
use crate::model::csv_report::{CsvErrorWarningType, CsvReport};
use crate::repo::RepoError;
use log::{error, info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Uploaded file as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Which importer is running; selects report wording and log labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Users,
    Language,
}

impl ImportKind {
    fn label(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Language => "language",
        }
    }

    fn empty_upload_message(self) -> &'static str {
        match self {
            Self::Users => "File does not contain any users.",
            Self::Language => "File does not contain a language.",
        }
    }

    /// Report carrying the single general error of a failed import.
    pub fn failure_report(self, err: impl Display) -> CsvReport {
        CsvReport::with_error(
            CsvErrorWarningType::GeneralError,
            self.failure_message(err),
        )
    }

    fn failure_message(self, err: impl Display) -> String {
        match self {
            Self::Users => format!("Unable to import users: {err}"),
            Self::Language => format!("Unable to import language: {err}"),
        }
    }
}

/// Failure that aborts a whole import.
#[derive(Debug)]
pub enum ImportError {
    Repo(RepoError),
    /// Configured starting role for new members is not stored.
    StartingRoleMissing(String),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::StartingRoleMissing(name) => {
                write!(f, "starting role `{name}` for new members does not exist")
            }
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::StartingRoleMissing(_) => None,
        }
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Runs `parse` over the upload lines inside `uow` and settles `uow`.
///
/// `parse` receives the unit-of-work connection and the decoded lines.
/// A failed commit is not followed by `rollback`: the commit consumed `uow`
/// and SQLite has already discarded the transaction.
pub fn run_import<U, F, E>(
    uow: U,
    kind: ImportKind,
    upload: Option<&Upload>,
    parse: F,
) -> CsvReport
where
    U: UnitOfWork,
    F: FnOnce(&Connection, &[String]) -> Result<CsvReport, E>,
    E: Display,
{
    let started_at = Instant::now();
    let label = kind.label();

    let Some(upload) = upload.filter(|upload| !upload.bytes.is_empty()) else {
        if let Err(err) = uow.rollback() {
            warn!("event=csv_import module=import kind={label} status=error stage=rollback error={err}");
        }
        warn!("event=csv_import module=import kind={label} status=rejected reason=empty_upload");
        return CsvReport::with_error(
            CsvErrorWarningType::BadDataFormat,
            kind.empty_upload_message(),
        );
    };

    let lines = split_lines(&decode_upload(&upload.bytes));
    info!(
        "event=csv_import module=import kind={label} status=start lines={}",
        lines.len()
    );

    let parsed = parse(uow.conn(), &lines);
    let report = match parsed {
        Ok(mut report) => {
            if let Err(err) = uow.commit() {
                error!("event=csv_import module=import kind={label} status=error stage=commit error={err}");
                report.add_error(CsvErrorWarningType::GeneralError, kind.failure_message(err));
            }
            report
        }
        Err(err) => {
            error!("event=csv_import module=import kind={label} status=error stage=parse error={err}");
            if let Err(rollback_err) = uow.rollback() {
                warn!("event=csv_import module=import kind={label} status=error stage=rollback error={rollback_err}");
            }
            kind.failure_report(err)
        }
    };

    info!(
        "event=csv_import module=import kind={label} status=ok errors={} warnings={} duration_ms={}",
        report.errors().len(),
        report.warnings().len(),
        started_at.elapsed().as_millis()
    );
    report
}
