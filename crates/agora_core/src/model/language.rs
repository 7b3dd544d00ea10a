//! Language and resource-string records.

use serde::Serialize;
use uuid::Uuid;

pub type LanguageId = Uuid;
pub type ResourceKeyId = Uuid;

/// Language stored in the forum, identified by its culture tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub id: LanguageId,
    pub name: String,
    pub culture: String,
    pub right_to_left: bool,
}

/// Name of a localizable string, shared by every language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceKey {
    pub id: ResourceKeyId,
    pub name: String,
    pub date_added: i64,
}

/// One key/value pair of a language, as exported to CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageValue {
    pub key: String,
    pub value: String,
}
