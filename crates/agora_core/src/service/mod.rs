//! Forum use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep CSV parsing, permission filtering and feed projection out of the
//!   action layer.
//!
//! # Invariants
//! - Services never begin or finish transactions. Import orchestration in
//!   [`import_service`] owns the unit of work for a whole upload.

use crate::repo::RepoResult;
use once_cell::sync::Lazy;
use regex::Regex;

pub mod activity_service;
pub mod feed_service;
pub mod forum_service;
pub mod import_service;
pub mod localization_service;
pub mod membership_service;
pub mod permission_service;

static SLUG_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Lowercases and collapses non-alphanumeric runs into `-`.
///
/// Returns `fallback` when nothing URL-safe remains.
pub fn slugify(value: &str, fallback: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let slug = SLUG_SEPARATOR_RE.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug.to_string()
    }
}

/// First of `base`, `base-1`, `base-2`, ... for which `exists` is false.
pub(crate) fn unique_slug<F>(base: &str, exists: F) -> RepoResult<String>
where
    F: Fn(&str) -> RepoResult<bool>,
{
    if !exists(base)? {
        return Ok(base.to_string());
    }
    let mut suffix = 1u32;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !exists(&candidate)? {
            return Ok(candidate);
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{slugify, unique_slug};

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Ada  Lovelace! ", "member"), "ada-lovelace");
        assert_eq!(slugify("__", "member"), "member");
    }

    #[test]
    fn unique_slug_appends_first_free_suffix() {
        let taken = ["ada", "ada-1"];
        let slug = unique_slug("ada", |candidate| Ok(taken.contains(&candidate)));
        assert_eq!(slug.ok().as_deref(), Some("ada-2"));
    }
}
