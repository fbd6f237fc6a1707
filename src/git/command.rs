use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ActionError, Result};
use crate::git::{parse_branch_listing, Repository};

/// Answers branch queries by running the `git` executable in a working tree
pub struct GitCommand {
    work_dir: PathBuf,
}

impl GitCommand {
    pub fn new(work_dir: impl AsRef<Path>) -> Self {
        GitCommand {
            work_dir: work_dir.as_ref().to_path_buf(),
        }
    }
}

impl Repository for GitCommand {
    fn list_branches_containing(&self, rev: &str) -> Result<Vec<String>> {
        let output = Command::new("git")
            .args(["branch", "-a", "--contains", rev])
            .current_dir(&self.work_dir)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ActionError::context(format!(
                "git branch failed with exit code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(parse_branch_listing(&String::from_utf8_lossy(&output.stdout)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fails_outside_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitCommand::new(dir.path());
        // Either git is missing (I/O error) or it reports "not a git repository"
        assert!(git.list_branches_containing("HEAD").is_err());
    }
}
