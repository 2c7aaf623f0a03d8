//! Todo item domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by both persistence backends.
//! - Provide lifecycle helpers for completion toggling.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - Unset optional fields take documented defaults (`notes` empty,
//!   `due_date`/`category_id` absent, `is_completed` false).
//! - The serialized shape keeps the original camelCase field names so a
//!   previously persisted collection reloads unchanged.

use crate::model::category::CategoryId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a todo item.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TodoId = Uuid;

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Stable ID used for updates, deletes and category links.
    pub id: TodoId,
    /// Short task text. Emptiness is a presentation-layer concern; the
    /// store persists whatever it is given.
    pub title: String,
    /// Whether the item is checked off.
    pub is_completed: bool,
    /// Free-form notes. Defaults to empty.
    #[serde(default)]
    pub notes: String,
    /// Calendar-day due date with no time component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Optional reference to a category. Nulled out when the category is
    /// deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

/// Validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Nil UUIDs would collide across records and are never valid ids.
    NilId,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "todo item id must not be the nil uuid"),
        }
    }
}

impl Error for TodoValidationError {}

impl TodoItem {
    /// Creates a new item with a generated stable ID and default fields.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates a new item with a caller-provided stable ID.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(id: TodoId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            is_completed: false,
            notes: String::new(),
            due_date: None,
            category_id: None,
        }
    }

    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.id.is_nil() {
            return Err(TodoValidationError::NilId);
        }
        Ok(())
    }

    /// Flips the completion flag. Applying it twice restores the original
    /// value.
    pub fn toggle_completion(&mut self) {
        self.is_completed = !self.is_completed;
    }
}
