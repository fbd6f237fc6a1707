//! host::traits
//!
//! Git data API used to build a commit remotely.
//!
//! # Design
//!
//! The trait is async because every call is network I/O. Each method maps to
//! one object-creation or lookup call of the hosting service; together they
//! form the blob → tree → commit → ref chain.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File mode for a regular, non-executable file.
pub const FILE_MODE: &str = "100644";

/// Errors from git data API operations.
#[derive(Debug, Clone, Error)]
pub enum HostError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested object or ref was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// One entry of a tree to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sha: String,
}

impl TreeEntry {
    /// A regular file entry pointing at a blob.
    pub fn blob(path: impl Into<String>, sha: impl Into<String>) -> Self {
        TreeEntry {
            path: path.into(),
            mode: FILE_MODE.to_string(),
            kind: "blob".to_string(),
            sha: sha.into(),
        }
    }
}

/// A commit as returned by the hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitObject {
    pub sha: String,
    pub tree_sha: String,
}

/// Git data API of a hosting service.
#[async_trait]
pub trait GitHost: Send + Sync {
    /// Store file content as a blob, returning its SHA.
    async fn create_blob(&self, content: &[u8]) -> Result<String, HostError>;

    /// Fetch a commit by SHA.
    async fn get_commit(&self, sha: &str) -> Result<CommitObject, HostError>;

    /// Create a tree layering `entries` on top of `base_tree`, returning its SHA.
    async fn create_tree(&self, base_tree: &str, entries: &[TreeEntry])
        -> Result<String, HostError>;

    /// Create a commit object, returning its SHA.
    async fn create_commit(
        &self,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<String, HostError>;

    /// Point `ref_name` (e.g. `heads/master`) at `sha`, returning the SHA the ref now holds.
    async fn update_ref(&self, ref_name: &str, sha: &str, force: bool)
        -> Result<String, HostError>;
}
