//! Category repository.

use crate::model::category::{Category, CategoryId};
use crate::repo::{parse_uuid, row_exists, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    slug,
    description,
    sort_order,
    date_created
FROM categories";

/// Repository interface for categories.
pub trait CategoryRepository {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    fn slug_exists(&self, slug: &str) -> RepoResult<bool>;
    /// Lists categories by `sort_order ASC, name ASC`.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        if category.name.trim().is_empty() || category.slug.trim().is_empty() {
            return Err(RepoError::Validation(
                "category name and slug must not be blank".to_string(),
            ));
        }

        self.conn.execute(
            "INSERT INTO categories (
                uuid,
                name,
                slug,
                description,
                sort_order,
                date_created
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                category.id.to_string(),
                category.name.as_str(),
                category.slug.as_str(),
                category.description.as_deref(),
                category.sort_order,
                category.date_created,
            ],
        )?;
        Ok(category.id)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_category_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn slug_exists(&self, slug: &str) -> RepoResult<bool> {
        row_exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM categories WHERE slug = ?1);",
            slug,
        )
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL} ORDER BY sort_order ASC, name COLLATE NOCASE ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Category {
        id: parse_uuid(&uuid_text, "categories.uuid")?,
        name: row.get("name")?,
        slug: row.get("slug")?,
        description: row.get("description")?,
        sort_order: row.get("sort_order")?,
        date_created: row.get("date_created")?,
    })
}
