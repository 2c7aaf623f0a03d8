//! Category repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `categories` storage.
//! - Own the delete policy for task references.
//!
//! # Invariants
//! - Write paths must call `Category::validate()` before SQL mutations.
//! - Deleting a category nulls out `category_id` on referencing tasks; it
//!   never cascades.
//! - Fetch order is name, case-insensitively.

use crate::model::category::{Category, CategoryColor, CategoryId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const CATEGORY_SELECT_SQL: &str = "SELECT id, name, color FROM categories";

/// Repository interface for category CRUD operations.
pub trait CategoryRepository {
    fn create(&self, category: &Category) -> RepoResult<CategoryId>;
    fn update(&self, category: &Category) -> RepoResult<()>;
    fn get(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    fn list_all(&self) -> RepoResult<Vec<Category>>;
    fn delete(&self, id: CategoryId) -> RepoResult<()>;
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
    fn create(&self, category: &Category) -> RepoResult<CategoryId> {
        category.validate()?;

        self.conn.execute(
            "INSERT INTO categories (id, name, color) VALUES (?1, ?2, ?3);",
            params![
                category.id.to_string(),
                category.name.as_str(),
                category.color.as_str(),
            ],
        )?;

        Ok(category.id)
    }

    fn update(&self, category: &Category) -> RepoResult<()> {
        category.validate()?;

        let changed = self.conn.execute(
            "UPDATE categories SET name = ?1, color = ?2 WHERE id = ?3;",
            params![
                category.name.as_str(),
                category.color.as_str(),
                category.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(category.id));
        }

        Ok(())
    }

    fn get(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }

        Ok(None)
    }

    fn list_all(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL} ORDER BY name COLLATE NOCASE ASC, id ASC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();

        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }

        Ok(categories)
    }

    fn delete(&self, id: CategoryId) -> RepoResult<()> {
        // foreign_keys=ON makes the ON DELETE SET NULL relationship null out
        // task references in the same statement.
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in categories.id"))
    })?;

    let color_text: String = row.get("color")?;
    let color = CategoryColor::parse(&color_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid color value `{color_text}` in categories.color"
        ))
    })?;

    let category = Category {
        id,
        name: row.get("name")?,
        color,
    };
    category.validate()?;
    Ok(category)
}
