//! Error handling for the production-line designer
//!
//! This module defines the crate-wide error type and a Result alias.
//! Editing operations on the canvas never fail loudly; errors here come from
//! the edges of the system (settings, palettes, the pipeline store and the
//! resource matcher).

use thiserror::Error;

/// Main error type for designer operations
#[derive(Error, Debug)]
pub enum DesignerError {
    /// Errors related to settings loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to palette/schema loading
    #[error("Palette error: {0}")]
    Palette(String),

    /// Errors related to the pipeline record store
    #[error("Storage error: {0}")]
    Storage(String),

    /// A pipeline record that does not exist
    #[error("Pipeline record not found: {0}")]
    RecordNotFound(String),

    /// Errors reported by the resource matcher
    #[error("Resource matching failed: {0}")]
    Matcher(String),

    /// Graph-level errors surfaced to callers that want a reason
    #[error("Graph error: {0}")]
    Graph(#[from] crate::graph::GraphError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DesignerError>,
    },
}

impl DesignerError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DesignerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for DesignerError {
    fn from(err: serde_json::Error) -> Self {
        DesignerError::Serialization(err.to_string())
    }
}

/// Result type alias for designer operations
pub type Result<T> = std::result::Result<T, DesignerError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DesignerError::Palette("unknown field type 'slider'".to_string());
        assert_eq!(err.to_string(), "Palette error: unknown field type 'slider'");
    }

    #[test]
    fn test_error_with_context() {
        let err = DesignerError::Storage("disk full".to_string());
        let with_ctx = err.with_context("Failed to save pipeline");
        assert!(with_ctx.to_string().contains("Failed to save pipeline"));
        assert!(with_ctx.to_string().contains("disk full"));
    }

    #[test]
    fn test_result_ext_lazy_context() {
        let result: Result<()> = Err(DesignerError::RecordNotFound("42".to_string()));
        let err = result.with_context(|| "Opening pipeline".to_string()).unwrap_err();
        assert!(err.to_string().starts_with("Opening pipeline"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: DesignerError = parse.unwrap_err().into();
        assert!(matches!(err, DesignerError::Serialization(_)));
    }
}
