//! Language, resource key and resource value repository.
//!
//! # Responsibility
//! - Persist languages keyed by culture tag.
//! - Persist resource keys shared by all languages and their per-language
//!   values.
//!
//! # Invariants
//! - Culture lookups are case-insensitive.
//! - Resource key names are unique; values are unique per (language, key).
//! - Language values are listed by key name ascending.

use crate::model::language::{Language, LanguageId, LanguageValue, ResourceKey, ResourceKeyId};
use crate::repo::{bool_to_int, parse_flag, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for languages and resource strings.
pub trait LocalizationRepository {
    fn create_language(&self, language: &Language) -> RepoResult<LanguageId>;
    fn get_language_by_culture(&self, culture: &str) -> RepoResult<Option<Language>>;
    fn list_languages(&self) -> RepoResult<Vec<Language>>;
    fn get_resource_key(&self, name: &str) -> RepoResult<Option<ResourceKey>>;
    fn create_resource_key(&self, key: &ResourceKey) -> RepoResult<ResourceKeyId>;
    /// Inserts or replaces the value of `key_id` in `language_id`.
    fn set_resource_value(
        &self,
        language_id: LanguageId,
        key_id: ResourceKeyId,
        value: &str,
    ) -> RepoResult<()>;
    /// All key/value pairs stored for one language.
    fn language_values(&self, language_id: LanguageId) -> RepoResult<Vec<LanguageValue>>;
    fn resource_value(&self, language_id: LanguageId, key: &str) -> RepoResult<Option<String>>;
}

/// SQLite-backed localization repository.
pub struct SqliteLocalizationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLocalizationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl LocalizationRepository for SqliteLocalizationRepository<'_> {
    fn create_language(&self, language: &Language) -> RepoResult<LanguageId> {
        if language.culture.trim().is_empty() {
            return Err(RepoError::Validation("language culture is blank".to_string()));
        }

        self.conn.execute(
            "INSERT INTO languages (uuid, name, culture, right_to_left)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                language.id.to_string(),
                language.name.as_str(),
                language.culture.as_str(),
                bool_to_int(language.right_to_left),
            ],
        )?;
        Ok(language.id)
    }

    fn get_language_by_culture(&self, culture: &str) -> RepoResult<Option<Language>> {
        self.conn
            .query_row(
                "SELECT uuid, name, culture, right_to_left
                 FROM languages
                 WHERE culture = ?1 COLLATE NOCASE;",
                [culture.trim()],
                |row| Ok(parse_language_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn list_languages(&self) -> RepoResult<Vec<Language>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, name, culture, right_to_left
             FROM languages
             ORDER BY name COLLATE NOCASE ASC, culture ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut languages = Vec::new();
        while let Some(row) = rows.next()? {
            languages.push(parse_language_row(row)?);
        }
        Ok(languages)
    }

    fn get_resource_key(&self, name: &str) -> RepoResult<Option<ResourceKey>> {
        let row = self
            .conn
            .query_row(
                "SELECT uuid, name, date_added FROM resource_keys WHERE name = ?1;",
                [name],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((uuid_text, name, date_added)) => Ok(Some(ResourceKey {
                id: parse_uuid(&uuid_text, "resource_keys.uuid")?,
                name,
                date_added,
            })),
            None => Ok(None),
        }
    }

    fn create_resource_key(&self, key: &ResourceKey) -> RepoResult<ResourceKeyId> {
        if key.name.trim().is_empty() {
            return Err(RepoError::Validation("resource key name is blank".to_string()));
        }

        self.conn.execute(
            "INSERT INTO resource_keys (uuid, name, date_added) VALUES (?1, ?2, ?3);",
            params![key.id.to_string(), key.name.as_str(), key.date_added],
        )?;
        Ok(key.id)
    }

    fn set_resource_value(
        &self,
        language_id: LanguageId,
        key_id: ResourceKeyId,
        value: &str,
    ) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO resource_values (language_uuid, resource_key_uuid, value)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (language_uuid, resource_key_uuid)
             DO UPDATE SET value = excluded.value;",
            params![language_id.to_string(), key_id.to_string(), value],
        )?;
        Ok(())
    }

    fn language_values(&self, language_id: LanguageId) -> RepoResult<Vec<LanguageValue>> {
        let mut stmt = self.conn.prepare(
            "SELECT k.name, v.value
             FROM resource_values v
             INNER JOIN resource_keys k ON k.uuid = v.resource_key_uuid
             WHERE v.language_uuid = ?1
             ORDER BY k.name ASC;",
        )?;
        let mut rows = stmt.query([language_id.to_string()])?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            values.push(LanguageValue {
                key: row.get(0)?,
                value: row.get(1)?,
            });
        }
        Ok(values)
    }

    fn resource_value(&self, language_id: LanguageId, key: &str) -> RepoResult<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT v.value
                 FROM resource_values v
                 INNER JOIN resource_keys k ON k.uuid = v.resource_key_uuid
                 WHERE v.language_uuid = ?1 AND k.name = ?2;",
                params![language_id.to_string(), key],
                |row| row.get(0),
            )
            .optional()?)
    }
}

fn parse_language_row(row: &Row<'_>) -> RepoResult<Language> {
    let uuid_text: String = row.get(0)?;
    Ok(Language {
        id: parse_uuid(&uuid_text, "languages.uuid")?,
        name: row.get(1)?,
        culture: row.get(2)?,
        right_to_left: parse_flag(row.get(3)?, "languages.right_to_left")?,
    })
}
