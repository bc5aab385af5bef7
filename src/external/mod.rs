//! Contracts of the collaborators the editor calls out to.
//!
//! - [`PathSelector`]: "given a browse request, eventually return a path or a
//!   structured resource handle". The desktop front end implements it with
//!   native file dialogs.
//! - [`ResourceMatcher`]: "given an input path and selected rule ids, return
//!   matched resource descriptors". [`CatalogMatcher`] serves the desktop app;
//!   requests run off the UI thread through [`MatchDispatcher`].

pub mod catalog;
pub mod dispatcher;

pub use catalog::{CatalogMatcher, SatelliteRule};
pub use dispatcher::{MatchDispatcher, MatchOutcome, MatchTicket};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

/// A file-name filter shown by the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

/// What the editor asks a path selector for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BrowseRequest {
    pub title: String,
    /// Pick a directory instead of a file.
    pub directory: bool,
    pub filters: Vec<BrowseFilter>,
}

impl BrowseRequest {
    pub fn file(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            directory: false,
            filters: Vec::new(),
        }
    }

    pub fn directory(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            directory: true,
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, name: &str, extensions: &[&str]) -> Self {
        self.filters.push(BrowseFilter {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        });
        self
    }
}

/// A selector's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectedPath {
    Path(PathBuf),
    Resource { id: String, name: String },
}

impl SelectedPath {
    /// Text stored into a parameter.
    pub fn to_param_text(&self) -> String {
        match self {
            SelectedPath::Path(path) => path.to_string_lossy().into_owned(),
            SelectedPath::Resource { id, .. } => id.clone(),
        }
    }
}

/// File/path selector dialog contract. `None` means the user cancelled.
pub trait PathSelector {
    fn browse(&self, request: &BrowseRequest) -> Option<SelectedPath>;
}

/// Input of a satellite-config matching run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub input_path: String,
    pub rule_ids: Vec<String>,
}

/// A resource found by the matcher.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedResource {
    pub id: String,
    pub name: String,
    pub satellite_type: String,
    pub sensor: String,
    pub code: String,
    pub resolution: String,
}

/// Satellite-config matcher contract. Called from a worker thread.
pub trait ResourceMatcher: Send + Sync {
    /// Rules the user can choose from.
    fn available_rules(&self) -> Vec<SatelliteRule> {
        Vec::new()
    }

    fn match_resources(&self, request: &MatchRequest) -> Result<Vec<MatchedResource>>;
}
