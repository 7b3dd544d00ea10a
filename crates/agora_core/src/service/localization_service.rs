//! Localization use-case service.
//!
//! # Responsibility
//! - Export one language as `key,value` lines.
//! - Import `key,value` lines into one language, creating the language
//!   from the culture catalogue and new keys on demand.
//! - Resolve resource strings with key fallback.
//!
//! # Invariants
//! - An unknown culture stops the import before any line is processed.
//! - Import lines split on the first comma; the value may contain commas.
//! - A new key is shared by all languages but only receives a value in the
//!   imported language.

use crate::csv_text::split_key_value;
use crate::model::csv_report::{CsvErrorWarningType, CsvReport};
use crate::model::culture::{all_cultures, find_culture, CultureInfo};
use crate::model::language::{Language, ResourceKey};
use crate::model::now_epoch_ms;
use crate::repo::localization_repo::LocalizationRepository;
use crate::repo::{RepoError, RepoResult};
use uuid::Uuid;

/// Localization service facade over a localization repository.
pub struct LocalizationService<R: LocalizationRepository> {
    repo: R,
}

impl<R: LocalizationRepository> LocalizationService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Languages that have been stored.
    pub fn languages_in_db(&self) -> RepoResult<Vec<Language>> {
        self.repo.list_languages()
    }

    /// Every culture the catalogue knows, stored or not.
    pub fn languages_all(&self) -> &'static [CultureInfo] {
        all_cultures()
    }

    pub fn get_language_by_culture(&self, culture: &str) -> RepoResult<Option<Language>> {
        self.repo.get_language_by_culture(culture)
    }

    /// Serializes one language ordered by key name.
    pub fn to_csv(&self, language: &Language) -> RepoResult<String> {
        let mut body = String::new();
        for pair in self.repo.language_values(language.id)? {
            body.push_str(&pair.key);
            body.push(',');
            body.push_str(&pair.value);
            body.push('\n');
        }
        Ok(body)
    }

    /// Imports `key,value` lines into the language of `culture`.
    pub fn from_csv(&self, culture: &str, lines: &[String]) -> RepoResult<CsvReport> {
        let mut report = CsvReport::new();
        if lines.is_empty() {
            report.add_error(
                CsvErrorWarningType::BadDataFormat,
                "No language keys or values found.",
            );
            return Ok(report);
        }

        let Some(culture_info) = find_culture(culture) else {
            report.add_error(
                CsvErrorWarningType::DoesNotExist,
                format!("The language culture '{culture}' does not exist."),
            );
            return Ok(report);
        };

        let language = match self.repo.get_language_by_culture(culture_info.culture)? {
            Some(language) => language,
            None => self.add_language(culture_info)?,
        };

        for (index, line) in lines.iter().enumerate() {
            let line_number = index + 1;
            let Some((key, value)) = split_key_value(line) else {
                report.add_error(
                    CsvErrorWarningType::MissingKeyOrValue,
                    format!("Line {line_number}: a key and a value are required."),
                );
                continue;
            };

            let key = key.trim();
            if key.is_empty() {
                continue;
            }

            let key_id = match self.repo.get_resource_key(key)? {
                Some(existing) => existing.id,
                None => {
                    let created = ResourceKey {
                        id: Uuid::new_v4(),
                        name: key.to_string(),
                        date_added: now_epoch_ms(),
                    };
                    self.repo.create_resource_key(&created)?;
                    report.add_warning(
                        CsvErrorWarningType::NewKeyCreated,
                        format!(
                            "A new key named '{key}' has been created, and will require a value in all languages."
                        ),
                    );
                    created.id
                }
            };

            self.repo.set_resource_value(language.id, key_id, value)?;
        }

        Ok(report)
    }

    /// Stores a language for a catalogue culture.
    pub fn add_language(&self, culture: &CultureInfo) -> RepoResult<Language> {
        let language = Language {
            id: Uuid::new_v4(),
            name: culture.name.to_string(),
            culture: culture.culture.to_string(),
            right_to_left: culture.right_to_left,
        };
        self.repo.create_language(&language)?;
        Ok(language)
    }

    /// Sets one string, creating the key when needed.
    pub fn set_resource(&self, language: &Language, key: &str, value: &str) -> RepoResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(RepoError::Validation("resource key name is blank".to_string()));
        }
        let key_id = match self.repo.get_resource_key(key)? {
            Some(existing) => existing.id,
            None => {
                let created = ResourceKey {
                    id: Uuid::new_v4(),
                    name: key.to_string(),
                    date_added: now_epoch_ms(),
                };
                self.repo.create_resource_key(&created)?
            }
        };
        self.repo.set_resource_value(language.id, key_id, value)
    }

    /// Stored string for `key`, or the key itself when it has no value.
    pub fn resource_string(&self, language: &Language, key: &str) -> RepoResult<String> {
        Ok(self
            .repo
            .resource_value(language.id, key)?
            .unwrap_or_else(|| key.to_string()))
    }
}
