//! Single-row forum settings repository.

use crate::model::settings::ForumSettings;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

pub trait SettingsRepository {
    /// Loads the settings row; missing settings are an invalid database.
    fn get_settings(&self) -> RepoResult<ForumSettings>;
    fn update_settings(&self, settings: &ForumSettings) -> RepoResult<()>;
}

pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn get_settings(&self) -> RepoResult<ForumSettings> {
        let row = self
            .conn
            .query_row(
                "SELECT
                    site_name,
                    site_url,
                    activities_per_page,
                    new_member_starting_role,
                    default_culture
                FROM settings
                WHERE id = 1;",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?
            .ok_or_else(|| RepoError::not_found("settings", 1))?;

        let (site_name, site_url, per_page, new_member_starting_role, default_culture) = row;
        let activities_per_page = u32::try_from(per_page)
            .ok()
            .filter(|value| *value > 0)
            .ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid activities_per_page `{per_page}` in settings"
                ))
            })?;

        Ok(ForumSettings {
            site_name,
            site_url,
            activities_per_page,
            new_member_starting_role,
            default_culture,
        })
    }

    fn update_settings(&self, settings: &ForumSettings) -> RepoResult<()> {
        if settings.activities_per_page == 0 {
            return Err(RepoError::Validation(
                "activities per page must be positive".to_string(),
            ));
        }

        let changed = self.conn.execute(
            "UPDATE settings
             SET site_name = ?1,
                 site_url = ?2,
                 activities_per_page = ?3,
                 new_member_starting_role = ?4,
                 default_culture = ?5
             WHERE id = 1;",
            params![
                settings.site_name.as_str(),
                settings.site_url.as_str(),
                i64::from(settings.activities_per_page),
                settings.new_member_starting_role.as_str(),
                settings.default_culture.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("settings", 1));
        }
        Ok(())
    }
}
