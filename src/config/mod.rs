//! Configuration module for the production-line designer
//!
//! This module handles:
//! - Application state persistence (settings, recent pipelines, last session)
//! - The location of the pipeline record store
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.geoline.designer/`
//! - **macOS**: `~/Library/Application Support/dev.geoline.designer/`
//! - **Windows**: `%APPDATA%\dev.geoline.designer\`
//!
//! # Files
//!
//! - `app_state.json` - Editor settings, palette override and recent pipelines
//! - `pipelines/` - One JSON record per saved production line
//! - `logs/` - Rolling log files

pub mod settings;

pub use settings::*;

use crate::error::{DesignerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.geoline.designer";

/// App state filename
pub const APP_STATE_FILE: &str = "app_state.json";

/// Directory (under the app data dir) holding pipeline records
pub const PIPELINES_DIR: &str = "pipelines";

/// Directory (under the app data dir) holding log files
pub const LOGS_DIR: &str = "logs";

/// Maximum number of recent pipelines to remember
pub const MAX_RECENT_PIPELINES: usize = 10;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        DesignerError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            DesignerError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the app state file
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

/// Default directory of the pipeline record store
pub fn pipelines_dir() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(PIPELINES_DIR))
}

// ==================== App State ====================

/// Persistent application state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// Editor tunables
    #[serde(default)]
    pub editor: EditorSettings,

    /// Optional TOML palette replacing the built-in catalog
    #[serde(default)]
    pub palette_path: Option<PathBuf>,

    /// Recently opened pipeline record ids, most recent first
    #[serde(default)]
    pub recent_pipelines: Vec<String>,

    /// Pipeline open when the app last closed
    #[serde(default)]
    pub last_pipeline: Option<String>,
}

fn default_app_state_version() -> u32 {
    1
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            editor: EditorSettings::default(),
            palette_path: None,
            recent_pipelines: Vec::new(),
            last_pipeline: None,
        }
    }
}

impl AppState {
    /// Load app state from the default location
    pub fn load() -> Result<Self> {
        let path = app_state_path().ok_or_else(|| {
            DesignerError::Config("Could not determine app state path".to_string())
        })?;
        Self::load_from(&path)
    }

    /// Load app state from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DesignerError::Config(format!("Failed to read app state: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| DesignerError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save app state to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(&dir.join(APP_STATE_FILE))
    }

    /// Save app state to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| DesignerError::Config(format!("Failed to serialize app state: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| DesignerError::Config(format!("Failed to write app state: {}", e)))
    }

    /// Record that a pipeline was opened or saved
    pub fn touch_pipeline(&mut self, id: &str) {
        self.recent_pipelines.retain(|p| p != id);
        self.recent_pipelines.insert(0, id.to_string());
        self.recent_pipelines.truncate(MAX_RECENT_PIPELINES);
        self.last_pipeline = Some(id.to_string());
    }

    /// Forget a pipeline (e.g. after deleting its record)
    pub fn forget_pipeline(&mut self, id: &str) {
        self.recent_pipelines.retain(|p| p != id);
        if self.last_pipeline.as_deref() == Some(id) {
            self.last_pipeline = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_pipeline_orders_and_truncates() {
        let mut state = AppState::default();
        for i in 0..12 {
            state.touch_pipeline(&format!("p{}", i));
        }
        state.touch_pipeline("p5");
        assert_eq!(state.recent_pipelines.len(), MAX_RECENT_PIPELINES);
        assert_eq!(state.recent_pipelines[0], "p5");
        assert_eq!(state.last_pipeline.as_deref(), Some("p5"));
        assert_eq!(
            state.recent_pipelines.iter().filter(|p| *p == "p5").count(),
            1
        );
    }

    #[test]
    fn test_forget_pipeline() {
        let mut state = AppState::default();
        state.touch_pipeline("a");
        state.forget_pipeline("a");
        assert!(state.recent_pipelines.is_empty());
        assert!(state.last_pipeline.is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(APP_STATE_FILE);
        let mut state = AppState::default();
        state.editor.history_depth = 7;
        state.touch_pipeline("line-1");
        state.save_to(&path).unwrap();

        let loaded = AppState::load_from(&path).unwrap();
        assert_eq!(loaded.editor.history_depth, 7);
        assert_eq!(loaded.last_pipeline.as_deref(), Some("line-1"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppState::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(loaded.version, 1);
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(APP_STATE_FILE);
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            AppState::load_from(&path),
            Err(DesignerError::Config(_))
        ));
    }
}
