use std::path::Path;
use std::sync::Mutex;

use git2::{BranchType, Repository as Git2Repo};

use crate::error::{ActionError, Result};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
        }
    }
}

impl super::Repository for Git2Repository {
    fn list_branches_containing(&self, rev: &str) -> Result<Vec<String>> {
        let repo = self
            .repo
            .lock()
            .map_err(|_| ActionError::context("repository lock poisoned"))?;

        let target = repo.revparse_single(rev)?.peel_to_commit()?.id();

        let mut names = Vec::new();
        for branch in repo.branches(None)? {
            let (branch, kind) = branch?;
            let Some(name) = branch.name()?.map(str::to_string) else {
                continue;
            };
            if name.ends_with("/HEAD") {
                continue;
            }

            let Some(tip) = branch.get().target() else {
                continue;
            };
            if tip != target && !repo.graph_descendant_of(tip, target)? {
                continue;
            }

            names.push(match kind {
                BranchType::Local => name,
                BranchType::Remote => format!("remotes/{}", name),
            });
        }

        Ok(names)
    }

    fn describe_query(&self, rev: &str) -> String {
        format!("libgit2: branches containing {}", rev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use git2::{Oid, Signature};

    fn commit(repo: &Git2Repo, message: &str, parents: &[Oid]) -> Oid {
        let signature = Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parents: Vec<_> = parents.iter().map(|p| repo.find_commit(*p).unwrap()).collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        repo.commit(None, &signature, &signature, message, &tree, &parent_refs)
            .unwrap()
    }

    #[test]
    fn test_lists_local_and_remote_branches_containing_tag() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();

        let root = commit(&repo, "root", &[]);
        let tagged = commit(&repo, "release", &[root]);
        let side = commit(&repo, "side", &[root]);

        repo.branch("master", &repo.find_commit(tagged).unwrap(), true)
            .unwrap();
        repo.branch("feature/x", &repo.find_commit(side).unwrap(), true)
            .unwrap();
        repo.reference("refs/remotes/origin/master", tagged, true, "fetch")
            .unwrap();
        repo.tag_lightweight("v1.0.0", repo.find_commit(tagged).unwrap().as_object(), false)
            .unwrap();

        let git = Git2Repository::from_git2(repo);
        let mut branches = git.list_branches_containing("v1.0.0").unwrap();
        branches.sort();

        assert_eq!(branches, vec!["master", "remotes/origin/master"]);
    }

    #[test]
    fn test_unknown_rev_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        commit(&repo, "root", &[]);

        let git = Git2Repository::from_git2(repo);
        assert!(git.list_branches_containing("no-such-tag").is_err());
    }
}
