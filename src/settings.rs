//! Operator preferences that survive restarts.
//!
//! Only preferences live here; edits made through the overlay never
//! persist. Missing or unreadable files fall back to defaults and a save
//! failure is logged, never fatal.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Resource, Serialize, Deserialize, Clone, Debug)]
pub struct InspectorSettings {
    /// Substring match case sensitivity for hierarchy search.
    #[serde(default)]
    pub case_sensitive: bool,
    /// Entities whose name contains this substring are hidden from the
    /// hierarchy. Empty disables the filter.
    #[serde(default)]
    pub exclude_filter: String,
    /// Show serializable reflected fields in generic sections.
    #[serde(default = "default_true")]
    pub show_public: bool,
    /// Show fields the type skips for serialization.
    #[serde(default)]
    pub show_non_public: bool,
}

fn default_true() -> bool {
    true
}

impl Default for InspectorSettings {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            exclude_filter: String::new(),
            show_public: true,
            show_non_public: false,
        }
    }
}

impl InspectorSettings {
    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("bevy_runtime_inspector");
            p.push("settings.ron");
            p
        })
    }

    /// Load settings from disk, or defaults when absent or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(content) => ron::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Best-effort save; failures are logged and ignored.
    pub fn save(&self) {
        let Some(path) = Self::file_path() else {
            error!("Could not determine config directory");
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {}", e);
                return;
            }
        }
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(content) => {
                if let Err(e) = fs::write(&path, content) {
                    error!("Failed to save inspector settings: {}", e);
                }
            }
            Err(e) => error!("Failed to serialize inspector settings: {}", e),
        }
    }
}
