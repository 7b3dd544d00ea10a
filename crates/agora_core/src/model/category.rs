//! Category and per-role permission records.
//!
//! # Invariants
//! - A permission that has no stored row for a category/role pair is
//!   treated as not ticked.

use crate::constants::PERMISSION_DENY_ACCESS;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

pub type CategoryId = Uuid;

/// Topic container; permissions are granted per category and role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Ascending display order; ties fall back to name.
    pub sort_order: i32,
    /// Creation date in epoch milliseconds.
    pub date_created: i64,
}

impl Category {
    pub fn new(name: impl Into<String>, slug: impl Into<String>, date_created: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: slug.into(),
            description: None,
            sort_order: 0,
            date_created,
        }
    }

    /// Site-relative category URL.
    pub fn nice_url(&self) -> String {
        format!("/cat/{}", self.slug)
    }
}

/// Ticked/unticked state of named permissions for one category and role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    ticks: BTreeMap<String, bool>,
}

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the state of one permission, replacing an earlier state.
    pub fn set(&mut self, permission: impl Into<String>, is_ticked: bool) {
        self.ticks.insert(permission.into(), is_ticked);
    }

    /// Returns whether `permission` is ticked; unknown permissions are not.
    pub fn is_ticked(&self, permission: &str) -> bool {
        self.ticks.get(permission).copied().unwrap_or(false)
    }

    /// Returns whether the role is barred from the category.
    pub fn denies_access(&self) -> bool {
        self.is_ticked(PERMISSION_DENY_ACCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::PermissionSet;
    use crate::constants::PERMISSION_DENY_ACCESS;

    #[test]
    fn missing_permission_is_not_ticked() {
        let set = PermissionSet::new();
        assert!(!set.is_ticked(PERMISSION_DENY_ACCESS));
        assert!(!set.denies_access());
    }

    #[test]
    fn later_state_replaces_earlier_state() {
        let mut set = PermissionSet::new();
        set.set(PERMISSION_DENY_ACCESS, true);
        assert!(set.denies_access());
        set.set(PERMISSION_DENY_ACCESS, false);
        assert!(!set.denies_access());
    }
}
