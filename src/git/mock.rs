use crate::error::{ActionError, Result};
use crate::git::{parse_branch_listing, Repository};
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    containing: HashMap<String, Vec<String>>,
    fallback: Option<Vec<String>>,
    fail: bool,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            containing: HashMap::new(),
            fallback: None,
            fail: false,
        }
    }

    /// Answer every query with the branches in raw `git branch` output
    pub fn with_output(output: &str) -> Self {
        MockRepository {
            fallback: Some(parse_branch_listing(output)),
            ..Self::new()
        }
    }

    /// A repository whose queries always fail
    pub fn failing() -> Self {
        MockRepository {
            fail: true,
            ..Self::new()
        }
    }

    /// Set the branches containing a specific rev
    pub fn set_containing(&mut self, rev: impl Into<String>, branches: &[&str]) {
        self.containing
            .insert(rev.into(), branches.iter().map(|b| b.to_string()).collect());
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_branches_containing(&self, rev: &str) -> Result<Vec<String>> {
        if self.fail {
            return Err(ActionError::context(format!("cannot resolve '{}'", rev)));
        }
        Ok(self
            .containing
            .get(rev)
            .or(self.fallback.as_ref())
            .cloned()
            .unwrap_or_default())
    }
}
