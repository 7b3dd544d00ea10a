//! Role and category-permission repository.
//!
//! # Responsibility
//! - Resolve roles by name.
//! - Store and load ticked permissions per category and role.
//!
//! # Invariants
//! - `permissions_for_role` returns an entry for every stored category,
//!   with an empty set when the role has no permission rows there.

use crate::model::category::{CategoryId, PermissionSet};
use crate::model::member::{Role, RoleId};
use crate::repo::{bool_to_int, parse_flag, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

/// Repository interface for roles and their category permissions.
pub trait RoleRepository {
    fn get_role_by_name(&self, name: &str) -> RepoResult<Option<Role>>;
    fn list_roles(&self) -> RepoResult<Vec<Role>>;
    /// Ticks or unticks one named permission for a category/role pair.
    fn set_category_permission(
        &self,
        category_id: CategoryId,
        role_id: RoleId,
        permission: &str,
        is_ticked: bool,
    ) -> RepoResult<()>;
    /// Loads the permission sets of `role_id` for every category.
    fn permissions_for_role(&self, role_id: RoleId)
        -> RepoResult<HashMap<CategoryId, PermissionSet>>;
}

/// SQLite-backed role repository.
pub struct SqliteRoleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRoleRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RoleRepository for SqliteRoleRepository<'_> {
    fn get_role_by_name(&self, name: &str) -> RepoResult<Option<Role>> {
        let row = self
            .conn
            .query_row(
                "SELECT uuid, name FROM roles WHERE name = ?1 COLLATE NOCASE;",
                [name.trim()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            Some((uuid_text, name)) => Ok(Some(Role {
                id: parse_uuid(&uuid_text, "roles.uuid")?,
                name,
            })),
            None => Ok(None),
        }
    }

    fn list_roles(&self) -> RepoResult<Vec<Role>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, name FROM roles ORDER BY name COLLATE NOCASE ASC;")?;
        let mut rows = stmt.query([])?;
        let mut roles = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get(0)?;
            roles.push(Role {
                id: parse_uuid(&uuid_text, "roles.uuid")?,
                name: row.get(1)?,
            });
        }
        Ok(roles)
    }

    fn set_category_permission(
        &self,
        category_id: CategoryId,
        role_id: RoleId,
        permission: &str,
        is_ticked: bool,
    ) -> RepoResult<()> {
        let permission_uuid: String = self
            .conn
            .query_row(
                "SELECT uuid FROM permissions WHERE name = ?1 COLLATE NOCASE;",
                [permission],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| RepoError::not_found("permission", permission))?;

        self.conn.execute(
            "INSERT INTO category_permissions (
                category_uuid,
                role_uuid,
                permission_uuid,
                is_ticked
            ) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (category_uuid, role_uuid, permission_uuid)
            DO UPDATE SET is_ticked = excluded.is_ticked;",
            params![
                category_id.to_string(),
                role_id.to_string(),
                permission_uuid,
                bool_to_int(is_ticked),
            ],
        )?;
        Ok(())
    }

    fn permissions_for_role(
        &self,
        role_id: RoleId,
    ) -> RepoResult<HashMap<CategoryId, PermissionSet>> {
        let mut by_category = HashMap::new();

        let mut categories = self.conn.prepare("SELECT uuid FROM categories;")?;
        let mut rows = categories.query([])?;
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get(0)?;
            by_category.insert(
                parse_uuid(&uuid_text, "categories.uuid")?,
                PermissionSet::new(),
            );
        }

        let mut ticks = self.conn.prepare(
            "SELECT cp.category_uuid, p.name, cp.is_ticked
             FROM category_permissions cp
             INNER JOIN permissions p ON p.uuid = cp.permission_uuid
             WHERE cp.role_uuid = ?1;",
        )?;
        let mut rows = ticks.query([role_id.to_string()])?;
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get(0)?;
            let category_id = parse_uuid(&uuid_text, "category_permissions.category_uuid")?;
            let is_ticked = parse_flag(row.get(2)?, "category_permissions.is_ticked")?;
            by_category
                .entry(category_id)
                .or_default()
                .set(row.get::<_, String>(1)?, is_ticked);
        }

        Ok(by_category)
    }
}
