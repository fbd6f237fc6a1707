//! Local, read-only git queries
//!
//! This module provides a trait-based abstraction over the one git query the
//! action needs: which branches contain a commit. The implementations are:
//!
//! - [command::GitCommand]: spawns `git branch -a --contains`
//! - [repository::Git2Repository]: answers the same question through `git2`
//! - [mock::MockRepository]: canned answers for testing
//!
//! Branch names follow `git branch -a`: local branches are bare names, remote
//! tracking branches are `remotes/<remote>/<name>`.

pub mod command;
pub mod mock;
pub mod repository;

pub use command::GitCommand;
pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Read-only branch containment query
///
/// ## Error Handling
///
/// Failures are reported as errors; callers decide whether a failed query is
/// fatal. The default branch gate treats it as "no branch contains the commit".
pub trait Repository: Send + Sync {
    /// List branches (local and remote tracking) whose history includes `rev`
    ///
    /// # Arguments
    /// * `rev` - A tag name, branch name or commit SHA
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Branch names, unordered
    /// * `Err` - If `rev` cannot be resolved or the query fails
    fn list_branches_containing(&self, rev: &str) -> Result<Vec<String>>;

    /// Human readable description of the query, echoed in the log
    fn describe_query(&self, rev: &str) -> String {
        format!("git branch -a --contains {}", rev)
    }
}

/// Parse `git branch` output into branch names.
///
/// Current-branch (`*`) and worktree (`+`) markers are dropped. Symbolic
/// entries such as `remotes/origin/HEAD -> origin/master` are skipped.
pub fn parse_branch_listing(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix("* ")
                .or_else(|| line.strip_prefix("+ "))
                .unwrap_or(line)
                .trim()
        })
        .filter(|name| !name.is_empty() && !name.contains(" -> ") && !name.starts_with('('))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_branch_listing() {
        let output = "* master\n  feature/x\n  remotes/origin/HEAD -> origin/master\n  remotes/origin/master\n";
        assert_eq!(
            parse_branch_listing(output),
            vec!["master", "feature/x", "remotes/origin/master"]
        );
    }

    #[test]
    fn test_parse_skips_detached_head_and_blank_lines() {
        let output = "* (HEAD detached at v1.0.0)\n\n  develop\n";
        assert_eq!(parse_branch_listing(output), vec!["develop"]);
    }

    #[test]
    fn test_parse_unindented_names() {
        assert_eq!(
            parse_branch_listing("master\nfeature/x"),
            vec!["master", "feature/x"]
        );
    }
}
