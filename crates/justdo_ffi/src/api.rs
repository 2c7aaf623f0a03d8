//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for UI integration: envelopes, not throws.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Ids and dates cross the boundary as strings (`uuid`, `YYYY-MM-DD`).

use chrono::NaiveDate;
use justdo_core::db::open_db;
use justdo_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Category, CategoryColor, CategoryFilter, CategoryPatch, SqliteCategoryRepository,
    SqliteTodoRepository, TodoDraft, TodoItem, TodoItemFilter, TodoPatch, TodoStore,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const DB_FILE_NAME: &str = "justdo.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Task row shaped for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItemView {
    /// Stable item ID in string form.
    pub id: String,
    pub title: String,
    pub is_completed: bool,
    pub notes: String,
    /// Due date as `YYYY-MM-DD`, absent when unset.
    pub due_date: Option<String>,
    /// Category ID in string form, absent when uncategorized.
    pub category_id: Option<String>,
}

/// Category row shaped for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    /// Stable category ID in string form.
    pub id: String,
    pub name: String,
    /// Color name from the closed set (`red|orange|yellow|green|blue|purple|gray`).
    pub color: String,
}

/// Generic action response envelope for mutation calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Optional record ID the operation created or touched.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            ok: true,
            id: Some(id.into()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Response envelope for task list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListResponse {
    pub items: Vec<TodoItemView>,
    pub message: String,
}

/// Response envelope for category list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryView>,
    pub message: String,
}

/// Lists tasks with the standard view filter.
///
/// Input semantics:
/// - `search_text`: case-insensitive substring match on titles; empty or
///   absent means no constraint.
/// - `category_id`: restrict to one category; absent means all categories.
/// - `show_completed`: when false, completed tasks are hidden.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; failures surface in `message` with an empty item list.
#[flutter_rust_bridge::frb(sync)]
pub fn list_todo_items(
    search_text: Option<String>,
    category_id: Option<String>,
    show_completed: bool,
) -> TodoListResponse {
    let category = match category_id.as_deref() {
        Some(raw) => match Uuid::parse_str(raw) {
            Ok(id) => Some(CategoryFilter::Id(id)),
            Err(_) => {
                return TodoListResponse {
                    items: Vec::new(),
                    message: format!("invalid category id `{raw}`"),
                };
            }
        },
        None => None,
    };

    let filter = TodoItemFilter {
        category,
        show_completed,
        search_text: search_text.unwrap_or_default(),
    };

    match with_store(|store| Ok(store.filtered_items(&filter))) {
        Ok(items) => {
            let items = items.iter().map(to_todo_view).collect::<Vec<_>>();
            let message = format!("{} task(s).", items.len());
            TodoListResponse { items, message }
        }
        Err(err) => TodoListResponse {
            items: Vec::new(),
            message: format!("list_todo_items failed: {err}"),
        },
    }
}

/// Creates a task.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; returns the created item ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn create_todo_item(
    title: String,
    notes: Option<String>,
    due_date: Option<String>,
    category_id: Option<String>,
) -> ActionResponse {
    let due_date = match parse_due_date(due_date.as_deref()) {
        Ok(value) => value,
        Err(message) => return ActionResponse::failure(message),
    };
    let category_id = match parse_optional_id(category_id.as_deref(), "category id") {
        Ok(value) => value,
        Err(message) => return ActionResponse::failure(message),
    };

    let draft = TodoDraft {
        title: title.trim().to_string(),
        notes: notes.unwrap_or_default(),
        due_date,
        category_id,
        ..TodoDraft::default()
    };

    match with_store(|store| store.add_item(draft.clone()).map_err(|err| err.to_string())) {
        Ok(item) => ActionResponse::success("Task created.", item.id.to_string()),
        Err(err) => ActionResponse::failure(format!("create_todo_item failed: {err}")),
    }
}

/// Updates supplied fields on an existing task.
///
/// Input semantics:
/// - Absent fields stay unchanged.
/// - `clear_due_date` / `clear_category` null the respective field and win
///   over a simultaneously supplied value.
/// - An unknown `id` is a no-op, mirroring stale edit screens.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn update_todo_item(
    id: String,
    title: Option<String>,
    is_completed: Option<bool>,
    notes: Option<String>,
    due_date: Option<String>,
    clear_due_date: bool,
    category_id: Option<String>,
    clear_category: bool,
) -> ActionResponse {
    let item_id = match Uuid::parse_str(&id) {
        Ok(value) => value,
        Err(_) => return ActionResponse::failure(format!("invalid item id `{id}`")),
    };

    let due_date_patch = if clear_due_date {
        Some(None)
    } else {
        match parse_due_date(due_date.as_deref()) {
            Ok(Some(date)) => Some(Some(date)),
            Ok(None) => None,
            Err(message) => return ActionResponse::failure(message),
        }
    };
    let category_patch = if clear_category {
        Some(None)
    } else {
        match parse_optional_id(category_id.as_deref(), "category id") {
            Ok(Some(category)) => Some(Some(category)),
            Ok(None) => None,
            Err(message) => return ActionResponse::failure(message),
        }
    };

    let patch = TodoPatch {
        title,
        is_completed,
        notes,
        due_date: due_date_patch,
        category_id: category_patch,
    };

    match with_store(|store| {
        store
            .update_item(item_id, &patch)
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => ActionResponse::success("Task updated.", id),
        Err(err) => ActionResponse::failure(format!("update_todo_item failed: {err}")),
    }
}

/// Flips a task's completion flag.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; an unknown id is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn toggle_todo_completion(id: String) -> ActionResponse {
    let item_id = match Uuid::parse_str(&id) {
        Ok(value) => value,
        Err(_) => return ActionResponse::failure(format!("invalid item id `{id}`")),
    };

    match with_store(|store| {
        store
            .toggle_completion(item_id)
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => ActionResponse::success("Task toggled.", id),
        Err(err) => ActionResponse::failure(format!("toggle_todo_completion failed: {err}")),
    }
}

/// Deletes a task.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; an unknown id is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_todo_item(id: String) -> ActionResponse {
    let item_id = match Uuid::parse_str(&id) {
        Ok(value) => value,
        Err(_) => return ActionResponse::failure(format!("invalid item id `{id}`")),
    };

    match with_store(|store| store.delete_item(item_id).map_err(|err| err.to_string())) {
        Ok(()) => ActionResponse::success("Task deleted.", id),
        Err(err) => ActionResponse::failure(format!("delete_todo_item failed: {err}")),
    }
}

/// Lists all categories in display order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; failures surface in `message` with an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn list_categories() -> CategoryListResponse {
    match with_store(|store| Ok(store.categories().to_vec())) {
        Ok(categories) => {
            let categories = categories.iter().map(to_category_view).collect::<Vec<_>>();
            let message = format!("{} category(ies).", categories.len());
            CategoryListResponse {
                categories,
                message,
            }
        }
        Err(err) => CategoryListResponse {
            categories: Vec::new(),
            message: format!("list_categories failed: {err}"),
        },
    }
}

/// Creates a category.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; rejects color names outside the closed set.
#[flutter_rust_bridge::frb(sync)]
pub fn create_category(name: String, color: String) -> ActionResponse {
    let Some(color) = CategoryColor::parse(&color) else {
        return ActionResponse::failure(format!("unknown category color `{color}`"));
    };

    match with_store(|store| {
        store
            .add_category(name.trim().to_string(), color)
            .map_err(|err| err.to_string())
    }) {
        Ok(category) => ActionResponse::success("Category created.", category.id.to_string()),
        Err(err) => ActionResponse::failure(format!("create_category failed: {err}")),
    }
}

/// Updates supplied fields on an existing category.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; an unknown id is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn update_category(id: String, name: Option<String>, color: Option<String>) -> ActionResponse {
    let category_id = match Uuid::parse_str(&id) {
        Ok(value) => value,
        Err(_) => return ActionResponse::failure(format!("invalid category id `{id}`")),
    };
    let color = match color {
        Some(raw) => match CategoryColor::parse(&raw) {
            Some(value) => Some(value),
            None => return ActionResponse::failure(format!("unknown category color `{raw}`")),
        },
        None => None,
    };

    let patch = CategoryPatch { name, color };

    match with_store(|store| {
        store
            .update_category(category_id, &patch)
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => ActionResponse::success("Category updated.", id),
        Err(err) => ActionResponse::failure(format!("update_category failed: {err}")),
    }
}

/// Deletes a category; referencing tasks become uncategorized.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; an unknown id is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_category(id: String) -> ActionResponse {
    let category_id = match Uuid::parse_str(&id) {
        Ok(value) => value,
        Err(_) => return ActionResponse::failure(format!("invalid category id `{id}`")),
    };

    match with_store(|store| {
        store
            .delete_category(category_id)
            .map_err(|err| err.to_string())
    }) {
        Ok(()) => ActionResponse::success("Category deleted.", id),
        Err(err) => ActionResponse::failure(format!("delete_category failed: {err}")),
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("JUSTDO_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_store<R>(
    f: impl FnOnce(
        &mut TodoStore<SqliteTodoRepository<'_>, SqliteCategoryRepository<'_>>,
    ) -> Result<R, String>,
) -> Result<R, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!("event=ffi_store module=ffi status=error error_code=db_open_failed error={err}");
        format!("db open failed: {err}")
    })?;
    let todo_repo = SqliteTodoRepository::new(&conn);
    let category_repo = SqliteCategoryRepository::new(&conn);
    let mut store =
        TodoStore::open(todo_repo, category_repo).map_err(|err| format!("store open failed: {err}"))?;
    store
        .seed_defaults_if_empty(true)
        .map_err(|err| format!("default seeding failed: {err}"))?;
    f(&mut store)
}

fn parse_optional_id(raw: Option<&str>, label: &str) -> Result<Option<Uuid>, String> {
    match raw {
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| format!("invalid {label} `{value}`")),
        None => Ok(None),
    }
}

fn parse_due_date(raw: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match raw {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("invalid due date `{value}`; expected YYYY-MM-DD")),
        None => Ok(None),
    }
}

fn to_todo_view(item: &TodoItem) -> TodoItemView {
    TodoItemView {
        id: item.id.to_string(),
        title: item.title.clone(),
        is_completed: item.is_completed,
        notes: item.notes.clone(),
        due_date: item.due_date.map(|date| date.format("%Y-%m-%d").to_string()),
        category_id: item.category_id.map(|id| id.to_string()),
    }
}

fn to_category_view(category: &Category) -> CategoryView {
    CategoryView {
        id: category.id.to_string(),
        name: category.name.clone(),
        color: category.color.as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, create_category, create_todo_item, delete_category, init_logging,
        list_categories, list_todo_items, ping, toggle_todo_completion,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn create_todo_item_appears_in_list() {
        let title = unique_token("ffi-create");
        let created = create_todo_item(title.clone(), None, None, None);
        assert!(created.ok, "{}", created.message);
        let created_id = created.id.clone().expect("create should return an id");

        let response = list_todo_items(Some(title), None, true);
        assert!(response.items.iter().any(|item| item.id == created_id));
    }

    #[test]
    fn toggle_hides_item_from_open_only_view() {
        let title = unique_token("ffi-toggle");
        let created = create_todo_item(title.clone(), None, None, None);
        assert!(created.ok, "{}", created.message);
        let created_id = created.id.expect("create should return an id");

        let toggled = toggle_todo_completion(created_id.clone());
        assert!(toggled.ok, "{}", toggled.message);

        let open_only = list_todo_items(Some(title.clone()), None, false);
        assert!(!open_only.items.iter().any(|item| item.id == created_id));

        let all = list_todo_items(Some(title), None, true);
        let item = all
            .items
            .iter()
            .find(|item| item.id == created_id)
            .expect("toggled item should stay listed");
        assert!(item.is_completed);
    }

    #[test]
    fn create_todo_item_rejects_malformed_due_date() {
        let response = create_todo_item(
            unique_token("ffi-bad-date"),
            None,
            Some("05/17/2025".to_string()),
            None,
        );
        assert!(!response.ok);
        assert!(response.message.contains("due date"));
    }

    #[test]
    fn category_delete_uncategorizes_referencing_task() {
        let name = unique_token("ffi-category");
        let category = create_category(name, "purple".to_string());
        assert!(category.ok, "{}", category.message);
        let category_id = category.id.expect("create should return an id");

        let title = unique_token("ffi-categorized");
        let created = create_todo_item(title.clone(), None, None, Some(category_id.clone()));
        assert!(created.ok, "{}", created.message);
        let created_id = created.id.expect("create should return an id");

        let deleted = delete_category(category_id.clone());
        assert!(deleted.ok, "{}", deleted.message);

        let categories = list_categories();
        assert!(!categories
            .categories
            .iter()
            .any(|category| category.id == category_id));

        let listed = list_todo_items(Some(title), None, true);
        let item = listed
            .items
            .iter()
            .find(|item| item.id == created_id)
            .expect("task should survive category delete");
        assert_eq!(item.category_id, None);
    }

    #[test]
    fn create_category_rejects_unknown_color() {
        let response = create_category(unique_token("ffi-bad-color"), "magenta".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("color"));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
