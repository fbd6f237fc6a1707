use std::path::PathBuf;

use thiserror::Error;

use crate::host::HostError;

/// Unified error type for release-bump operations
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Autoload file not found in {}", dir.display())]
    AutoloadNotFound { dir: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Trigger context error: {0}")]
    Context(String),

    #[error("Invalid replacement pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Remote operation failed: {0}")]
    Host(#[from] HostError),

    #[error("{stage} failed: {source}")]
    Commit {
        stage: &'static str,
        /// Whether re-running from scratch cannot leave a ref in a wrong state
        retry_safe: bool,
        #[source]
        source: HostError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-bump
pub type Result<T> = std::result::Result<T, ActionError>;

impl ActionError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ActionError::Config(msg.into())
    }

    /// Create a trigger context error with context
    pub fn context(msg: impl Into<String>) -> Self {
        ActionError::Context(msg.into())
    }

    /// Whether this error is the missing autoload file integrity failure
    pub fn is_autoload_not_found(&self) -> bool {
        matches!(self, ActionError::AutoloadNotFound { .. })
    }
}
