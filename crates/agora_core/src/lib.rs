//! Core domain logic for the Agora forum.
//! Admin CSV import/export, syndication feeds and the activity stream live
//! here; front ends only parse arguments and write responses.

pub mod api;
pub mod constants;
pub mod csv_text;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;

pub use api::{ApiError, ApiResult, CsvFileResult, XmlResult};
pub use db::{open_db, open_db_in_memory, DbError, SqliteUnitOfWork, UnitOfWork};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::csv_report::{CsvErrorWarning, CsvErrorWarningType, CsvReport, CsvReportEnvelope};
pub use repo::{RepoError, RepoResult};
pub use service::import_service::{ImportError, ImportKind, Upload};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
