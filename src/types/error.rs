//! Unified Error Type
//!
//! Centralized error type for the library. Per-file analysis never surfaces
//! these to batch callers directly: they are downgraded into `failed`
//! outcomes or per-phase `error` fields, so every failure keeps a message.
//!
//! ## Error Kinds
//!
//! - **Io**: the file or directory could not be read (fatal for one file)
//! - **Decode**: bytes of a text-bearing file are not valid UTF-8
//! - **Parse**: a category analyzer could not parse its format
//! - **Enrichment / Timeout**: the optional enrichment step failed

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScopeError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Analysis Errors
    // -------------------------------------------------------------------------
    #[error("Cannot decode {path} as UTF-8: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Parse error in {format}: {message}")]
    Parse { format: String, message: String },

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    // -------------------------------------------------------------------------
    // Enrichment Errors
    // -------------------------------------------------------------------------
    #[error("Enrichment error: {0}")]
    Enrichment(String),

    /// Operation timeout with context
    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Context(String),
}

pub type Result<T> = std::result::Result<T, ScopeError>;

impl ScopeError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a parse error for a named format
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.into(),
        }
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;

    /// Add context using a closure (lazy evaluation)
    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| ScopeError::Context(format!("{}: {}", context.into(), e)))
    }

    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| ScopeError::Context(format!("{}: {}", f().into(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ScopeError::parse("json", "expected value at line 1");
        assert_eq!(
            err.to_string(),
            "Parse error in json: expected value at line 1"
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = ScopeError::timeout("enrichment", Duration::from_millis(20));
        assert_eq!(err.to_string(), "Timeout after 20ms: enrichment");
    }

    #[test]
    fn test_with_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = result.with_context("reading report").unwrap_err();
        assert_eq!(err.to_string(), "reading report: missing");
    }

    #[test]
    fn test_not_a_directory_display() {
        let err = ScopeError::NotADirectory(PathBuf::from("/tmp/file.txt"));
        assert_eq!(err.to_string(), "Not a directory: /tmp/file.txt");
    }
}
