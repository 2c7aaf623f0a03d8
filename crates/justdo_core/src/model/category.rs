//! Category domain model.
//!
//! # Responsibility
//! - Define the named, colored tag assignable to todo items.
//! - Keep the color set closed so every backend and UI agrees on it.
//!
//! # Invariants
//! - `id` is stable and never reused for another category.
//! - `color` is always one of the fixed [`CategoryColor`] variants; unknown
//!   color names are rejected at the persistence boundary.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a category.
pub type CategoryId = Uuid;

/// Closed color set for category tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Gray,
}

impl CategoryColor {
    /// All variants, in display order.
    pub const ALL: [CategoryColor; 7] = [
        CategoryColor::Red,
        CategoryColor::Orange,
        CategoryColor::Yellow,
        CategoryColor::Green,
        CategoryColor::Blue,
        CategoryColor::Purple,
        CategoryColor::Gray,
    ];

    /// Stable lowercase name used in persisted state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Gray => "gray",
        }
    }

    /// Parses a persisted color name. Returns `None` for names outside the
    /// closed set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "red" => Some(Self::Red),
            "orange" => Some(Self::Orange),
            "yellow" => Some(Self::Yellow),
            "green" => Some(Self::Green),
            "blue" => Some(Self::Blue),
            "purple" => Some(Self::Purple),
            "gray" => Some(Self::Gray),
            _ => None,
        }
    }
}

impl Display for CategoryColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named, colored tag assignable to todo items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Stable ID referenced by `TodoItem::category_id`.
    pub id: CategoryId,
    /// Display name. Emptiness is a presentation-layer concern.
    pub name: String,
    /// Color tag from the closed set.
    pub color: CategoryColor,
}

/// Validation failures for category records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    NilId,
}

impl Display for CategoryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "category id must not be the nil uuid"),
        }
    }
}

impl Error for CategoryValidationError {}

impl Category {
    /// Creates a new category with a generated stable ID.
    pub fn new(name: impl Into<String>, color: CategoryColor) -> Self {
        Self::with_id(Uuid::new_v4(), name, color)
    }

    /// Creates a new category with a caller-provided stable ID.
    pub fn with_id(id: CategoryId, name: impl Into<String>, color: CategoryColor) -> Self {
        Self {
            id,
            name: name.into(),
            color,
        }
    }

    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.id.is_nil() {
            return Err(CategoryValidationError::NilId);
        }
        Ok(())
    }
}
