//! Repository implementations over the preferences document.
//!
//! # Responsibility
//! - Satisfy the same `TodoRepository`/`CategoryRepository` contracts as the
//!   SQLite backend, over in-memory collections with write-through.
//!
//! # Invariants
//! - List order is insertion order; this backend never sorts.
//! - Deleting a category nulls out `category_id` on referencing tasks in the
//!   same write.

use crate::model::category::{Category, CategoryId};
use crate::model::todo::{TodoId, TodoItem};
use crate::prefs::store::PrefsStore;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::todo_repo::{TodoListQuery, TodoRepository};
use crate::repo::{RepoError, RepoResult};

/// Preferences-backed todo item repository.
pub struct PrefsTodoRepository<'a> {
    store: &'a PrefsStore,
}

impl<'a> PrefsTodoRepository<'a> {
    pub fn new(store: &'a PrefsStore) -> Self {
        Self { store }
    }
}

impl TodoRepository for PrefsTodoRepository<'_> {
    fn create(&self, item: &TodoItem) -> RepoResult<TodoId> {
        item.validate()?;

        {
            let mut document = self.store.document_mut();
            if document.todo_items.iter().any(|row| row.id == item.id) {
                return Err(RepoError::InvalidData(format!(
                    "duplicate todo item id {}",
                    item.id
                )));
            }
            document.todo_items.push(item.clone());
        }
        self.store.persist("todo_create");

        Ok(item.id)
    }

    fn update(&self, item: &TodoItem) -> RepoResult<()> {
        item.validate()?;

        {
            let mut document = self.store.document_mut();
            let Some(row) = document
                .todo_items
                .iter_mut()
                .find(|row| row.id == item.id)
            else {
                return Err(RepoError::NotFound(item.id));
            };
            *row = item.clone();
        }
        self.store.persist("todo_update");

        Ok(())
    }

    fn get(&self, id: TodoId) -> RepoResult<Option<TodoItem>> {
        Ok(self
            .store
            .document()
            .todo_items
            .iter()
            .find(|row| row.id == id)
            .cloned())
    }

    fn list(&self, query: &TodoListQuery) -> RepoResult<Vec<TodoItem>> {
        Ok(self
            .store
            .document()
            .todo_items
            .iter()
            .filter(|row| query.matches(row))
            .cloned()
            .collect())
    }

    fn delete(&self, id: TodoId) -> RepoResult<()> {
        {
            let mut document = self.store.document_mut();
            let before = document.todo_items.len();
            document.todo_items.retain(|row| row.id != id);
            if document.todo_items.len() == before {
                return Err(RepoError::NotFound(id));
            }
        }
        self.store.persist("todo_delete");

        Ok(())
    }
}

/// Preferences-backed category repository.
pub struct PrefsCategoryRepository<'a> {
    store: &'a PrefsStore,
}

impl<'a> PrefsCategoryRepository<'a> {
    pub fn new(store: &'a PrefsStore) -> Self {
        Self { store }
    }
}

impl CategoryRepository for PrefsCategoryRepository<'_> {
    fn create(&self, category: &Category) -> RepoResult<CategoryId> {
        category.validate()?;

        {
            let mut document = self.store.document_mut();
            if document
                .todo_categories
                .iter()
                .any(|row| row.id == category.id)
            {
                return Err(RepoError::InvalidData(format!(
                    "duplicate category id {}",
                    category.id
                )));
            }
            document.todo_categories.push(category.clone());
        }
        self.store.persist("category_create");

        Ok(category.id)
    }

    fn update(&self, category: &Category) -> RepoResult<()> {
        category.validate()?;

        {
            let mut document = self.store.document_mut();
            let Some(row) = document
                .todo_categories
                .iter_mut()
                .find(|row| row.id == category.id)
            else {
                return Err(RepoError::NotFound(category.id));
            };
            *row = category.clone();
        }
        self.store.persist("category_update");

        Ok(())
    }

    fn get(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        Ok(self
            .store
            .document()
            .todo_categories
            .iter()
            .find(|row| row.id == id)
            .cloned())
    }

    fn list_all(&self) -> RepoResult<Vec<Category>> {
        Ok(self.store.document().todo_categories.clone())
    }

    fn delete(&self, id: CategoryId) -> RepoResult<()> {
        {
            let mut document = self.store.document_mut();
            let before = document.todo_categories.len();
            document.todo_categories.retain(|row| row.id != id);
            if document.todo_categories.len() == before {
                return Err(RepoError::NotFound(id));
            }

            // Same policy as the SQLite ON DELETE SET NULL relationship.
            for item in document
                .todo_items
                .iter_mut()
                .filter(|item| item.category_id == Some(id))
            {
                item.category_id = None;
            }
        }
        self.store.persist("category_delete");

        Ok(())
    }
}
