//! Member and role records.
//!
//! # Invariants
//! - `user_name` is unique case-insensitively.
//! - `slug` is unique and URL-safe; it backs the member's public URL.

use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub type MemberId = Uuid;
pub type RoleId = Uuid;

/// Named permission role (`Admin`, `Standard Members`, `Guest`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}

/// Registered forum member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub user_name: String,
    pub slug: String,
    pub email: String,
    pub password_salt: String,
    pub is_approved: bool,
    /// Join date in epoch milliseconds.
    pub create_date: i64,
    pub age: Option<i32>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub signature: Option<String>,
    /// Uploaded avatar URL or site-relative path.
    pub avatar: Option<String>,
}

impl Member {
    /// Creates an unapproved member with a generated id and salt.
    ///
    /// `slug` is left empty; membership service assigns a unique one.
    pub fn new(user_name: impl Into<String>, email: impl Into<String>, create_date: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_name: user_name.into(),
            slug: String::new(),
            email: email.into(),
            password_salt: Uuid::new_v4().simple().to_string(),
            is_approved: false,
            create_date,
            age: None,
            location: None,
            website: None,
            facebook: None,
            signature: None,
            avatar: None,
        }
    }

    /// Site-relative profile URL.
    pub fn nice_url(&self) -> String {
        format!("/members/{}", self.slug)
    }

    /// Image shown next to the member: avatar when set, Gravatar otherwise.
    pub fn image_url(&self, size: u32) -> String {
        match self.avatar.as_deref().map(str::trim) {
            Some(avatar) if !avatar.is_empty() => avatar.to_string(),
            _ => gravatar_url(&self.email, size),
        }
    }
}

/// Uniqueness key for `user_name`: trimmed and Unicode lower-cased.
pub fn user_name_key(user_name: &str) -> String {
    user_name.trim().to_lowercase()
}

/// Gravatar URL keyed by the SHA-256 of the normalized email.
pub fn gravatar_url(email: &str, size: u32) -> String {
    let digest = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{}?s={size}&d=identicon",
        hex::encode(digest)
    )
}

#[cfg(test)]
mod tests {
    use super::{gravatar_url, user_name_key, Member};

    #[test]
    fn gravatar_hash_ignores_case_and_surrounding_whitespace() {
        assert_eq!(
            gravatar_url(" Ada@Example.com ", 50),
            gravatar_url("ada@example.com", 50)
        );
        assert!(gravatar_url("ada@example.com", 80).ends_with("?s=80&d=identicon"));
    }

    #[test]
    fn user_name_key_folds_non_ascii_case() {
        assert_eq!(user_name_key(" Émile "), user_name_key("émile"));
        assert_eq!(user_name_key("ÖZİL"), "özi\u{307}l");
    }

    #[test]
    fn image_url_prefers_avatar() {
        let mut member = Member::new("ada", "ada@example.com", 0);
        assert!(member.image_url(50).starts_with("https://www.gravatar.com/avatar/"));

        member.avatar = Some("/content/uploads/ada.png".to_string());
        assert_eq!(member.image_url(50), "/content/uploads/ada.png");
    }
}
