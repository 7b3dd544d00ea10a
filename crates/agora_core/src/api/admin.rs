//! Admin import/export actions.

use crate::api::{ApiResult, CsvFileResult};
use crate::constants::{NO_SUCH_LANGUAGE_BODY, USERS_EXPORT_FILE_NAME};
use crate::db::{SqliteUnitOfWork, UnitOfWork};
use crate::model::csv_report::{CsvReport, CsvReportEnvelope};
use crate::model::culture::CultureInfo;
use crate::model::language::Language;
use crate::repo::localization_repo::SqliteLocalizationRepository;
use crate::repo::member_repo::SqliteMemberRepository;
use crate::repo::role_repo::{RoleRepository, SqliteRoleRepository};
use crate::repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
use crate::repo::RepoResult;
use crate::service::import_service::{run_import, ImportError, ImportKind, Upload};
use crate::service::localization_service::LocalizationService;
use crate::service::membership_service::MembershipService;
use log::{error, info};
use rusqlite::Connection;
use serde::Serialize;
use std::time::Instant;

/// Languages offered for export and cultures offered for import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageImportExportView {
    pub export_languages: Vec<Language>,
    pub import_languages: Vec<CultureInfo>,
}

pub fn languages(conn: &mut Connection) -> ApiResult<LanguageImportExportView> {
    let uow = SqliteUnitOfWork::begin_read(conn, "admin_languages")?;
    let outcome = load_languages(uow.conn());
    uow.release();
    Ok(outcome?)
}

/// All members as `MVCForumUsers.csv`.
pub fn export_users(conn: &mut Connection) -> ApiResult<CsvFileResult> {
    let started_at = Instant::now();
    let uow = SqliteUnitOfWork::begin_read(conn, "export_users")?;
    let outcome = MembershipService::new(SqliteMemberRepository::new(uow.conn())).to_csv();
    uow.release();

    let body = outcome?;
    info!(
        "event=csv_export module=admin kind=users status=ok bytes={} duration_ms={}",
        body.len(),
        started_at.elapsed().as_millis()
    );
    Ok(CsvFileResult {
        file_download_name: Some(USERS_EXPORT_FILE_NAME.to_string()),
        body,
    })
}

/// Imports members; the envelope reports every failure, including a
/// failure to start the unit of work.
pub fn import_users(conn: &mut Connection, upload: Option<&Upload>) -> CsvReportEnvelope {
    let uow = match SqliteUnitOfWork::begin(conn, "import_users") {
        Ok(uow) => uow,
        Err(err) => {
            error!("event=csv_import module=admin kind=users status=error stage=begin error={err}");
            return ImportKind::Users.failure_report(err).to_envelope();
        }
    };

    let report = run_import(
        uow,
        ImportKind::Users,
        upload,
        |conn, lines| -> Result<CsvReport, ImportError> {
            let settings = SqliteSettingsRepository::new(conn).get_settings()?;
            let role_name = settings.new_member_starting_role;
            let starting_role = SqliteRoleRepository::new(conn)
                .get_role_by_name(&role_name)?
                .ok_or(ImportError::StartingRoleMissing(role_name))?;
            let membership = MembershipService::new(SqliteMemberRepository::new(conn));
            Ok(membership.from_csv(lines, &starting_role)?)
        },
    );
    report.to_envelope()
}

/// One language as `{culture}.csv`, or an inline placeholder when the
/// culture has no stored language.
pub fn export_language(conn: &mut Connection, culture: &str) -> ApiResult<CsvFileResult> {
    let uow = SqliteUnitOfWork::begin_read(conn, "export_language")?;
    let outcome = build_language_export(uow.conn(), culture);
    uow.release();

    match outcome? {
        Some(result) => {
            info!(
                "event=csv_export module=admin kind=language status=ok culture={culture} bytes={}",
                result.body.len()
            );
            Ok(result)
        }
        None => {
            error!("event=csv_export module=admin kind=language status=error reason=no_such_language culture={culture}");
            Ok(CsvFileResult {
                file_download_name: None,
                body: NO_SUCH_LANGUAGE_BODY.to_string(),
            })
        }
    }
}

pub fn import_language(
    conn: &mut Connection,
    culture: &str,
    upload: Option<&Upload>,
) -> CsvReportEnvelope {
    let uow = match SqliteUnitOfWork::begin(conn, "import_language") {
        Ok(uow) => uow,
        Err(err) => {
            error!("event=csv_import module=admin kind=language status=error stage=begin error={err}");
            return ImportKind::Language.failure_report(err).to_envelope();
        }
    };

    let report = run_import(uow, ImportKind::Language, upload, |conn, lines| {
        LocalizationService::new(SqliteLocalizationRepository::new(conn)).from_csv(culture, lines)
    });
    report.to_envelope()
}

fn load_languages(conn: &Connection) -> RepoResult<LanguageImportExportView> {
    let localization = LocalizationService::new(SqliteLocalizationRepository::new(conn));
    Ok(LanguageImportExportView {
        export_languages: localization.languages_in_db()?,
        import_languages: localization.languages_all().to_vec(),
    })
}

/// The download is named after `culture` exactly as requested.
fn build_language_export(conn: &Connection, culture: &str) -> RepoResult<Option<CsvFileResult>> {
    let localization = LocalizationService::new(SqliteLocalizationRepository::new(conn));
    let Some(language) = localization.get_language_by_culture(culture)? else {
        return Ok(None);
    };
    Ok(Some(CsvFileResult {
        file_download_name: Some(format!("{culture}.csv")),
        body: localization.to_csv(&language)?,
    }))
}
