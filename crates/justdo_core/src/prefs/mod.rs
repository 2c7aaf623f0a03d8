//! Preferences-blob persistence backend.
//!
//! # Responsibility
//! - Persist whole collections as JSON under named slots in one on-disk
//!   preferences document.
//! - Provide repository implementations over that document.
//!
//! # Invariants
//! - The document is loaded once at store construction.
//! - Every mutation rewrites the document synchronously (write-through).
//! - A slot that fails to decode is treated as "no data", never as an error.
//! - A failed write is logged; the in-memory state is not rolled back.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod repos;
mod store;

pub use repos::{PrefsCategoryRepository, PrefsTodoRepository};
pub use store::{PrefsStore, CATEGORIES_SLOT, SETTINGS_SLOT, TODO_ITEMS_SLOT};

/// Failure while reading or writing the preferences document.
///
/// Surfaced only in logs; the persistence contract of this backend is
/// fire-and-forget.
#[derive(Debug)]
pub enum PrefsError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl Display for PrefsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PrefsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for PrefsError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for PrefsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}
