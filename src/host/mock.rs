//! host::mock
//!
//! In-memory git host for tests. Records every call in order and can be told
//! to fail a specific operation.

use std::sync::Mutex;

use async_trait::async_trait;

use super::traits::{CommitObject, GitHost, HostError, TreeEntry};

/// A call made against the mock, with its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    CreateBlob { content: Vec<u8> },
    GetCommit { sha: String },
    CreateTree { base_tree: String, entries: Vec<TreeEntry> },
    CreateCommit { message: String, tree: String, parents: Vec<String> },
    UpdateRef { ref_name: String, sha: String, force: bool },
}

impl HostCall {
    /// Short operation name, convenient for asserting call order.
    pub fn operation(&self) -> &'static str {
        match self {
            HostCall::CreateBlob { .. } => "create_blob",
            HostCall::GetCommit { .. } => "get_commit",
            HostCall::CreateTree { .. } => "create_tree",
            HostCall::CreateCommit { .. } => "create_commit",
            HostCall::UpdateRef { .. } => "update_ref",
        }
    }
}

/// Mock git host for testing without network access
#[derive(Debug)]
pub struct MockGitHost {
    calls: Mutex<Vec<HostCall>>,
    fail_on: Option<&'static str>,
    base_tree: String,
    commit_sha: String,
}

impl MockGitHost {
    pub fn new() -> Self {
        MockGitHost {
            calls: Mutex::new(Vec::new()),
            fail_on: None,
            base_tree: "base-tree-sha".to_string(),
            commit_sha: "new-commit-sha".to_string(),
        }
    }

    /// Make the named operation (see [`HostCall::operation`]) fail.
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    /// SHA returned by `create_commit`.
    pub fn with_commit_sha(mut self, sha: impl Into<String>) -> Self {
        self.commit_sha = sha.into();
        self
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn operations(&self) -> Vec<&'static str> {
        self.calls().iter().map(HostCall::operation).collect()
    }

    fn record(&self, call: HostCall) -> Result<(), HostError> {
        let operation = call.operation();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.fail_on == Some(operation) {
            return Err(HostError::ApiError {
                status: 500,
                message: format!("{} failed", operation),
            });
        }
        Ok(())
    }
}

impl Default for MockGitHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitHost for MockGitHost {
    async fn create_blob(&self, content: &[u8]) -> Result<String, HostError> {
        self.record(HostCall::CreateBlob {
            content: content.to_vec(),
        })?;
        Ok(format!("blob-{}", content.len()))
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitObject, HostError> {
        self.record(HostCall::GetCommit {
            sha: sha.to_string(),
        })?;
        Ok(CommitObject {
            sha: sha.to_string(),
            tree_sha: self.base_tree.clone(),
        })
    }

    async fn create_tree(
        &self,
        base_tree: &str,
        entries: &[TreeEntry],
    ) -> Result<String, HostError> {
        self.record(HostCall::CreateTree {
            base_tree: base_tree.to_string(),
            entries: entries.to_vec(),
        })?;
        Ok("new-tree-sha".to_string())
    }

    async fn create_commit(
        &self,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<String, HostError> {
        self.record(HostCall::CreateCommit {
            message: message.to_string(),
            tree: tree.to_string(),
            parents: parents.to_vec(),
        })?;
        Ok(self.commit_sha.clone())
    }

    async fn update_ref(
        &self,
        ref_name: &str,
        sha: &str,
        force: bool,
    ) -> Result<String, HostError> {
        self.record(HostCall::UpdateRef {
            ref_name: ref_name.to_string(),
            sha: sha.to_string(),
            force,
        })?;
        Ok(sha.to_string())
    }
}
