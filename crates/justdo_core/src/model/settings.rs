//! App-level display settings.
//!
//! Persisted as a named slot in the preferences document next to the task and
//! category collections. Missing or partial slots fall back to defaults field
//! by field.

use serde::{Deserialize, Serialize};

/// UI accent themes offered by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    Blue,
    Green,
    Purple,
    Orange,
    Red,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self::Blue
    }
}

/// Display options controlled from the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Whether completed tasks stay visible in list views.
    pub show_completed_tasks: bool,
    /// Whether completed tasks sink below open ones in list views.
    pub sort_completed_to_bottom: bool,
    /// Accent color theme.
    pub color_theme: ColorTheme,
}
