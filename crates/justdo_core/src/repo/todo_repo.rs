//! Todo item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and predicate-query APIs over `todo_items` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `TodoItem::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Fetch order is completion state first, then title case-insensitively.

use crate::model::category::CategoryId;
use crate::model::todo::{TodoId, TodoItem};
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const TODO_SELECT_SQL: &str = "SELECT
    id,
    title,
    is_completed,
    notes,
    due_date,
    category_id
FROM todo_items";

/// Category predicate for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Only items with no category reference.
    Uncategorized,
    /// Only items referencing the given category.
    Id(CategoryId),
}

/// Query options for listing todo items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoListQuery {
    /// Optional category predicate.
    pub category: Option<CategoryFilter>,
    /// Optional completion-flag equality predicate.
    pub completed: Option<bool>,
    /// Optional case-insensitive substring match on the title.
    pub title_contains: Option<String>,
}

impl TodoListQuery {
    /// Evaluates the query predicates against one record in memory.
    ///
    /// The preferences backend and the store facade both use this, so SQL
    /// predicates and in-memory filtering cannot drift apart.
    pub fn matches(&self, item: &TodoItem) -> bool {
        match self.category {
            Some(CategoryFilter::Uncategorized) if item.category_id.is_some() => return false,
            Some(CategoryFilter::Id(category_id)) if item.category_id != Some(category_id) => {
                return false;
            }
            _ => {}
        }

        if let Some(completed) = self.completed {
            if item.is_completed != completed {
                return false;
            }
        }

        if let Some(needle) = self.title_contains.as_deref() {
            if !item
                .title
                .to_lowercase()
                .contains(needle.to_lowercase().as_str())
            {
                return false;
            }
        }

        true
    }
}

/// Repository interface for todo item CRUD operations.
pub trait TodoRepository {
    fn create(&self, item: &TodoItem) -> RepoResult<TodoId>;
    fn update(&self, item: &TodoItem) -> RepoResult<()>;
    fn get(&self, id: TodoId) -> RepoResult<Option<TodoItem>>;
    fn list(&self, query: &TodoListQuery) -> RepoResult<Vec<TodoItem>>;
    fn delete(&self, id: TodoId) -> RepoResult<()>;
}

/// SQLite-backed todo item repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create(&self, item: &TodoItem) -> RepoResult<TodoId> {
        item.validate()?;

        self.conn.execute(
            "INSERT INTO todo_items (
                id,
                title,
                is_completed,
                notes,
                due_date,
                category_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                item.id.to_string(),
                item.title.as_str(),
                bool_to_int(item.is_completed),
                item.notes.as_str(),
                item.due_date,
                item.category_id.map(|id| id.to_string()),
            ],
        )?;

        Ok(item.id)
    }

    fn update(&self, item: &TodoItem) -> RepoResult<()> {
        item.validate()?;

        let changed = self.conn.execute(
            "UPDATE todo_items
             SET
                title = ?1,
                is_completed = ?2,
                notes = ?3,
                due_date = ?4,
                category_id = ?5
             WHERE id = ?6;",
            params![
                item.title.as_str(),
                bool_to_int(item.is_completed),
                item.notes.as_str(),
                item.due_date,
                item.category_id.map(|id| id.to_string()),
                item.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(item.id));
        }

        Ok(())
    }

    fn get(&self, id: TodoId) -> RepoResult<Option<TodoItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn list(&self, query: &TodoListQuery) -> RepoResult<Vec<TodoItem>> {
        let mut sql = format!("{TODO_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        match query.category {
            Some(CategoryFilter::Uncategorized) => {
                sql.push_str(" AND category_id IS NULL");
            }
            Some(CategoryFilter::Id(category_id)) => {
                sql.push_str(" AND category_id = ?");
                bind_values.push(Value::Text(category_id.to_string()));
            }
            None => {}
        }

        if let Some(completed) = query.completed {
            sql.push_str(" AND is_completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }

        if let Some(needle) = query.title_contains.as_deref() {
            sql.push_str(" AND instr(lower(title), lower(?)) > 0");
            bind_values.push(Value::Text(needle.to_string()));
        }

        sql.push_str(" ORDER BY is_completed ASC, title COLLATE NOCASE ASC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_todo_row(row)?);
        }

        Ok(items)
    }

    fn delete(&self, id: TodoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todo_items WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<TodoItem> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in todo_items.id"))
    })?;

    let is_completed = match row.get::<_, i64>("is_completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_completed value `{other}` in todo_items.is_completed"
            )));
        }
    };

    let category_id = match row.get::<_, Option<String>>("category_id")? {
        Some(value) => Some(Uuid::parse_str(&value).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid uuid value `{value}` in todo_items.category_id"
            ))
        })?),
        None => None,
    };

    let item = TodoItem {
        id,
        title: row.get("title")?,
        is_completed,
        notes: row.get("notes")?,
        due_date: row.get::<_, Option<NaiveDate>>("due_date")?,
        category_id,
    };
    item.validate()?;
    Ok(item)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
