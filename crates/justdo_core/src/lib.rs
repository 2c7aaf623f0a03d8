//! Core domain logic for JustDo, a single-user task tracker.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryColor, CategoryId, CategoryValidationError};
pub use model::settings::{AppSettings, ColorTheme};
pub use model::todo::{TodoId, TodoItem, TodoValidationError};
pub use prefs::{PrefsCategoryRepository, PrefsStore, PrefsTodoRepository};
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::todo_repo::{CategoryFilter, SqliteTodoRepository, TodoListQuery, TodoRepository};
pub use repo::{RepoError, RepoResult};
pub use service::todo_store::{
    CategoryPatch, StoreChange, SubscriberId, TodoDraft, TodoItemFilter, TodoPatch, TodoStore,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
