//! Role lookup and per-category access resolution for one viewing role.

use crate::model::category::{CategoryId, PermissionSet};
use crate::model::member::Role;
use crate::repo::role_repo::RoleRepository;
use crate::repo::RepoResult;
use std::collections::HashMap;

/// Permission sets of one role, keyed by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPermissions {
    pub role: Role,
    by_category: HashMap<CategoryId, PermissionSet>,
}

impl CategoryPermissions {
    pub fn new(role: Role, by_category: HashMap<CategoryId, PermissionSet>) -> Self {
        Self { role, by_category }
    }

    /// Whether the role may see `category_id`; unknown categories are open.
    pub fn allows(&self, category_id: CategoryId) -> bool {
        self.by_category
            .get(&category_id)
            .map_or(true, |set| !set.denies_access())
    }

    /// Visible categories among the ones permissions were loaded for.
    pub fn allowed_categories(&self) -> Vec<CategoryId> {
        let mut ids: Vec<CategoryId> = self
            .by_category
            .iter()
            .filter(|(_, set)| !set.denies_access())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }
}

pub struct PermissionService<R: RoleRepository> {
    repo: R,
}

impl<R: RoleRepository> PermissionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn role_by_name(&self, name: &str) -> RepoResult<Option<Role>> {
        self.repo.get_role_by_name(name)
    }

    /// Loads every category permission of `role` in one pass.
    pub fn category_permissions(&self, role: &Role) -> RepoResult<CategoryPermissions> {
        let by_category = self.repo.permissions_for_role(role.id)?;
        Ok(CategoryPermissions::new(role.clone(), by_category))
    }

    pub fn set_permission(
        &self,
        category_id: CategoryId,
        role: &Role,
        permission: &str,
        is_ticked: bool,
    ) -> RepoResult<()> {
        self.repo
            .set_category_permission(category_id, role.id, permission, is_ticked)
    }
}

#[cfg(test)]
mod tests {
    use super::CategoryPermissions;
    use crate::constants::PERMISSION_DENY_ACCESS;
    use crate::model::category::PermissionSet;
    use crate::model::member::Role;
    use std::collections::HashMap;
    use uuid::Uuid;

    #[test]
    fn denied_category_is_hidden_and_unknown_category_is_open() {
        let open = Uuid::new_v4();
        let denied = Uuid::new_v4();
        let mut deny = PermissionSet::new();
        deny.set(PERMISSION_DENY_ACCESS, true);

        let permissions = CategoryPermissions::new(
            Role {
                id: Uuid::new_v4(),
                name: "Guest".to_string(),
            },
            HashMap::from([(open, PermissionSet::new()), (denied, deny)]),
        );

        assert!(permissions.allows(open));
        assert!(!permissions.allows(denied));
        assert!(permissions.allows(Uuid::new_v4()));
        assert_eq!(permissions.allowed_categories(), vec![open]);
    }
}
