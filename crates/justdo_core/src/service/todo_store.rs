//! Observable store facade over the task and category repositories.
//!
//! # Responsibility
//! - Own the in-memory mirrors the presentation layer renders from.
//! - Apply partial-update semantics on top of whole-record repositories.
//! - Notify subscribers after every successful mutation.
//!
//! # Invariants
//! - Mirrors are re-fetched from the backend after each mutation, so they
//!   never drift from persisted state within one process.
//! - A mutation addressed at a missing id is logged and ignored; it is not
//!   an error at this layer.
//! - Single logical thread of execution; no locking.

use crate::model::category::{Category, CategoryColor, CategoryId};
use crate::model::todo::{TodoId, TodoItem};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::todo_repo::{CategoryFilter, TodoListQuery, TodoRepository};
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use log::{info, warn};
use uuid::Uuid;

/// Default category set created on first run.
const DEFAULT_CATEGORIES: &[(&str, CategoryColor)] = &[
    ("Work", CategoryColor::Blue),
    ("Personal", CategoryColor::Green),
    ("Shopping", CategoryColor::Orange),
    ("Urgent", CategoryColor::Red),
];

/// Collection touched by a store mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Todos,
    Categories,
}

/// Handle returned by [`TodoStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Field values for a new task. Unset optional fields take documented
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: String,
    pub is_completed: bool,
    pub notes: String,
    pub due_date: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update for a task. The outer `Option` marks a field as supplied;
/// for nullable fields the inner `Option` distinguishes set from clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub is_completed: Option<bool>,
    pub notes: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub category_id: Option<Option<CategoryId>>,
}

/// Partial update for a category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<CategoryColor>,
}

/// View filter over the task mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItemFilter {
    /// Optional category predicate.
    pub category: Option<CategoryFilter>,
    /// When false, completed tasks are hidden.
    pub show_completed: bool,
    /// Case-insensitive substring match on the title; empty means no match
    /// constraint.
    pub search_text: String,
}

impl Default for TodoItemFilter {
    fn default() -> Self {
        Self {
            category: None,
            show_completed: true,
            search_text: String::new(),
        }
    }
}

type Listener = Box<dyn Fn(StoreChange)>;

/// Observable mutation/query facade over persisted collections.
pub struct TodoStore<T, C> {
    todo_repo: T,
    category_repo: C,
    items: Vec<TodoItem>,
    categories: Vec<Category>,
    listeners: Vec<(SubscriberId, Listener)>,
    next_subscriber: u64,
}

impl<T: TodoRepository, C: CategoryRepository> TodoStore<T, C> {
    /// Opens the store over the given repositories and loads both mirrors.
    pub fn open(todo_repo: T, category_repo: C) -> RepoResult<Self> {
        let mut store = Self {
            todo_repo,
            category_repo,
            items: Vec::new(),
            categories: Vec::new(),
            listeners: Vec::new(),
            next_subscriber: 0,
        };
        store.refresh()?;
        Ok(store)
    }

    /// Ordered view of the task mirror.
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Ordered view of the category mirror.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Re-fetches both mirrors from the backend.
    ///
    /// Public so hosts can react to saves from another context (the backend
    /// does not push change notifications across connections).
    pub fn refresh(&mut self) -> RepoResult<()> {
        self.refresh_items()?;
        self.refresh_categories()?;
        Ok(())
    }

    /// Registers a change listener invoked after every successful mutation.
    pub fn subscribe(&mut self, listener: impl Fn(StoreChange) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Creates a task with a fresh id and the draft's field values, persists
    /// it and returns the created record.
    pub fn add_item(&mut self, draft: TodoDraft) -> RepoResult<TodoItem> {
        let item = item_from_draft(draft);
        self.todo_repo.create(&item)?;
        self.refresh_items()?;
        self.notify(StoreChange::Todos);
        Ok(item)
    }

    /// Applies the supplied fields to an existing task.
    ///
    /// A missing id is logged and ignored, matching the original UI
    /// contract for stale edit screens.
    pub fn update_item(&mut self, id: TodoId, patch: &TodoPatch) -> RepoResult<()> {
        let Some(mut item) = self.items.iter().find(|item| item.id == id).cloned() else {
            warn!("event=store_update module=service status=skipped reason=not_found id={id}");
            return Ok(());
        };

        if let Some(title) = patch.title.clone() {
            item.title = title;
        }
        if let Some(is_completed) = patch.is_completed {
            item.is_completed = is_completed;
        }
        if let Some(notes) = patch.notes.clone() {
            item.notes = notes;
        }
        if let Some(due_date) = patch.due_date {
            item.due_date = due_date;
        }
        if let Some(category_id) = patch.category_id {
            item.category_id = category_id;
        }

        self.write_item(item)
    }

    /// Flips a task's completion flag. Applying it twice restores the
    /// original value.
    pub fn toggle_completion(&mut self, id: TodoId) -> RepoResult<()> {
        let Some(mut item) = self.items.iter().find(|item| item.id == id).cloned() else {
            warn!("event=store_toggle module=service status=skipped reason=not_found id={id}");
            return Ok(());
        };
        item.toggle_completion();
        self.write_item(item)
    }

    /// Removes a task. A missing id is logged and ignored.
    pub fn delete_item(&mut self, id: TodoId) -> RepoResult<()> {
        match self.todo_repo.delete(id) {
            Ok(()) => {}
            Err(RepoError::NotFound(_)) => {
                warn!(
                    "event=store_delete module=service status=skipped reason=not_found id={id}"
                );
                return Ok(());
            }
            Err(err) => return Err(err),
        }
        self.refresh_items()?;
        self.notify(StoreChange::Todos);
        Ok(())
    }

    /// Pure in-memory filter over the task mirror. Predicates are
    /// AND-combined; order follows the mirror.
    pub fn filtered_items(&self, filter: &TodoItemFilter) -> Vec<TodoItem> {
        let query = TodoListQuery {
            category: filter.category,
            completed: if filter.show_completed {
                None
            } else {
                Some(false)
            },
            title_contains: if filter.search_text.is_empty() {
                None
            } else {
                Some(filter.search_text.clone())
            },
        };
        self.items
            .iter()
            .filter(|item| query.matches(item))
            .cloned()
            .collect()
    }

    /// Creates a category, persists it and returns the created record.
    pub fn add_category(&mut self, name: impl Into<String>, color: CategoryColor) -> RepoResult<Category> {
        let category = Category::new(name, color);
        self.category_repo.create(&category)?;
        self.refresh_categories()?;
        self.notify(StoreChange::Categories);
        Ok(category)
    }

    /// Applies the supplied fields to an existing category. A missing id is
    /// logged and ignored.
    pub fn update_category(&mut self, id: CategoryId, patch: &CategoryPatch) -> RepoResult<()> {
        let Some(mut category) = self
            .categories
            .iter()
            .find(|category| category.id == id)
            .cloned()
        else {
            warn!("event=store_update module=service status=skipped reason=not_found id={id}");
            return Ok(());
        };

        if let Some(name) = patch.name.clone() {
            category.name = name;
        }
        if let Some(color) = patch.color {
            category.color = color;
        }

        match self.category_repo.update(&category) {
            Ok(()) => {}
            Err(RepoError::NotFound(_)) => {
                warn!("event=store_update module=service status=skipped reason=not_found id={id}");
                return Ok(());
            }
            Err(err) => return Err(err),
        }
        self.refresh_categories()?;
        self.notify(StoreChange::Categories);
        Ok(())
    }

    /// Removes a category and nulls out references from tasks. Refreshes
    /// both mirrors because the delete touches both collections.
    pub fn delete_category(&mut self, id: CategoryId) -> RepoResult<()> {
        match self.category_repo.delete(id) {
            Ok(()) => {}
            Err(RepoError::NotFound(_)) => {
                warn!(
                    "event=store_delete module=service status=skipped reason=not_found id={id}"
                );
                return Ok(());
            }
            Err(err) => return Err(err),
        }
        self.refresh()?;
        self.notify(StoreChange::Categories);
        self.notify(StoreChange::Todos);
        Ok(())
    }

    /// First-run seeding: creates the default category set when the category
    /// collection is empty, and optionally a few sample tasks.
    ///
    /// Returns whether anything was created.
    pub fn seed_defaults_if_empty(&mut self, sample_tasks: bool) -> RepoResult<bool> {
        if !self.categories.is_empty() {
            return Ok(false);
        }

        for (name, color) in DEFAULT_CATEGORIES {
            self.category_repo.create(&Category::new(*name, *color))?;
        }
        self.refresh_categories()?;

        if sample_tasks && self.items.is_empty() {
            let work = self.category_id_by_name("Work");
            let personal = self.category_id_by_name("Personal");

            let samples = [
                TodoDraft {
                    title: "Complete project proposal".to_string(),
                    notes: "Include budget and timeline".to_string(),
                    category_id: work,
                    ..TodoDraft::default()
                },
                TodoDraft {
                    title: "Schedule dentist appointment".to_string(),
                    category_id: personal,
                    ..TodoDraft::default()
                },
                TodoDraft {
                    title: "Prepare sprint review notes".to_string(),
                    notes: "Collect demo screenshots".to_string(),
                    category_id: work,
                    ..TodoDraft::default()
                },
            ];
            for draft in samples {
                self.todo_repo.create(&item_from_draft(draft))?;
            }
            self.refresh_items()?;
        }

        info!(
            "event=store_seed module=service status=ok categories={} sample_tasks={sample_tasks}",
            DEFAULT_CATEGORIES.len()
        );
        self.notify(StoreChange::Categories);
        self.notify(StoreChange::Todos);
        Ok(true)
    }

    fn category_id_by_name(&self, name: &str) -> Option<CategoryId> {
        self.categories
            .iter()
            .find(|category| category.name == name)
            .map(|category| category.id)
    }

    fn write_item(&mut self, item: TodoItem) -> RepoResult<()> {
        match self.todo_repo.update(&item) {
            Ok(()) => {}
            Err(RepoError::NotFound(id)) => {
                warn!("event=store_update module=service status=skipped reason=not_found id={id}");
                return Ok(());
            }
            Err(err) => return Err(err),
        }
        self.refresh_items()?;
        self.notify(StoreChange::Todos);
        Ok(())
    }

    fn refresh_items(&mut self) -> RepoResult<()> {
        self.items = self.todo_repo.list(&TodoListQuery::default())?;
        Ok(())
    }

    fn refresh_categories(&mut self) -> RepoResult<()> {
        self.categories = self.category_repo.list_all()?;
        Ok(())
    }

    fn notify(&self, change: StoreChange) {
        for (_, listener) in &self.listeners {
            listener(change);
        }
    }
}

fn item_from_draft(draft: TodoDraft) -> TodoItem {
    TodoItem {
        id: Uuid::new_v4(),
        title: draft.title,
        is_completed: draft.is_completed,
        notes: draft.notes,
        due_date: draft.due_date,
        category_id: draft.category_id,
    }
}
