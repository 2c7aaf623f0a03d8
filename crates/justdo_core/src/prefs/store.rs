//! On-disk preferences document with named slots.
//!
//! # Responsibility
//! - Own the in-memory copy of the document and its write-through policy.
//! - Keep slot decoding independent, so one corrupt slot does not drop the
//!   others.
//!
//! # Invariants
//! - Slot names are stable: `todoItems`, `todoCategories`, `settings`.
//! - Reloading a previously persisted document reconstructs the identical
//!   record set (round-trip fidelity).

use crate::model::category::Category;
use crate::model::settings::AppSettings;
use crate::model::todo::TodoItem;
use crate::prefs::PrefsError;
use log::{error, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Slot holding the serialized task collection.
pub const TODO_ITEMS_SLOT: &str = "todoItems";
/// Slot holding the serialized category collection.
pub const CATEGORIES_SLOT: &str = "todoCategories";
/// Slot holding display settings.
pub const SETTINGS_SLOT: &str = "settings";

/// Full document shape persisted to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PrefsDocument {
    #[serde(rename = "todoItems", default)]
    pub todo_items: Vec<TodoItem>,
    #[serde(rename = "todoCategories", default)]
    pub todo_categories: Vec<Category>,
    #[serde(rename = "settings", default)]
    pub settings: AppSettings,
}

/// Preferences-backed document store.
///
/// Single-threaded by design; interior mutability lets both repository
/// views share one loaded document.
pub struct PrefsStore {
    path: PathBuf,
    data: RefCell<PrefsDocument>,
}

impl PrefsStore {
    /// Loads the document at `path`, falling back to empty collections and
    /// default settings when the file is missing or undecodable.
    ///
    /// # Side effects
    /// - Emits `prefs_load` logging events.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = load_document(&path);
        info!(
            "event=prefs_load module=prefs status=ok path={} items={} categories={}",
            path.display(),
            data.todo_items.len(),
            data.todo_categories.len()
        );
        Self {
            path,
            data: RefCell::new(data),
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a copy of the persisted display settings.
    pub fn settings(&self) -> AppSettings {
        self.data.borrow().settings
    }

    /// Replaces the settings slot and writes through.
    pub fn update_settings(&self, settings: AppSettings) {
        self.data.borrow_mut().settings = settings;
        self.persist("settings_update");
    }

    pub(crate) fn document(&self) -> Ref<'_, PrefsDocument> {
        self.data.borrow()
    }

    pub(crate) fn document_mut(&self) -> RefMut<'_, PrefsDocument> {
        self.data.borrow_mut()
    }

    /// Rewrites the whole document. Failures are logged and swallowed; the
    /// in-memory state is already mutated and intentionally stays that way.
    pub(crate) fn persist(&self, operation: &str) {
        if let Err(err) = self.try_persist() {
            error!(
                "event=prefs_write module=prefs status=error operation={operation} path={} error={err}",
                self.path.display()
            );
        }
    }

    fn try_persist(&self) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let encoded = serde_json::to_vec_pretty(&*self.data.borrow())?;
        std::fs::write(&self.path, encoded)?;
        Ok(())
    }
}

fn load_document(path: &Path) -> PrefsDocument {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return PrefsDocument::default();
        }
        Err(err) => {
            warn!(
                "event=prefs_load module=prefs status=error path={} error_code=read_failed error={err}",
                path.display()
            );
            return PrefsDocument::default();
        }
    };

    let value: serde_json::Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                "event=prefs_load module=prefs status=error path={} error_code=decode_failed error={err}",
                path.display()
            );
            return PrefsDocument::default();
        }
    };

    // Slots decode independently: a corrupt task array must not wipe the
    // category collection, and vice versa.
    PrefsDocument {
        todo_items: decode_slot(&value, TODO_ITEMS_SLOT),
        todo_categories: decode_slot(&value, CATEGORIES_SLOT),
        settings: decode_slot(&value, SETTINGS_SLOT),
    }
}

fn decode_slot<T: DeserializeOwned + Default>(document: &serde_json::Value, slot: &str) -> T {
    let Some(raw) = document.get(slot) else {
        return T::default();
    };
    match serde_json::from_value(raw.clone()) {
        Ok(decoded) => decoded,
        Err(err) => {
            warn!("event=prefs_load module=prefs status=error slot={slot} error_code=slot_decode_failed error={err}");
            T::default()
        }
    }
}
