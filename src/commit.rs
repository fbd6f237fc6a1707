//! Remote commit construction.
//!
//! A commit is built purely through the hosting service's git data API as a
//! single forward chain:
//!
//! ```text
//! parent commit ─▶ blobs ─▶ tree ─▶ commit ─▶ ref update
//! ```
//!
//! Each link is produced by one remote call and feeds the next. Only the ref
//! update is visible to anyone else, so a failure at any earlier stage leaves
//! nothing behind but unreferenced objects.

use std::path::Path;

use futures::future::try_join_all;

use crate::boundary::GateFailure;
use crate::config::Config;
use crate::context::TriggerContext;
use crate::error::{ActionError, Result};
use crate::gate::get_update_branch;
use crate::git::Repository;
use crate::host::{GitHost, TreeEntry};
use crate::ui::{ActionOutput, Logger};

/// Name of the step output carrying the new commit SHA.
pub const SHA_OUTPUT: &str = "sha";

/// Variable exported so later steps see the new commit as the run's SHA.
pub const SHA_VARIABLE: &str = "GITHUB_SHA";

/// State of the commit construction.
///
/// Object creation is retry-safe: a repeated call creates the same or an
/// unreferenced object. The forced ref update is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitStage {
    CreatingBlobs,
    CreatingTree {
        blobs: Vec<TreeEntry>,
    },
    CreatingCommit {
        blobs: Vec<TreeEntry>,
        tree_sha: String,
    },
    UpdatingRef {
        blobs: Vec<TreeEntry>,
        tree_sha: String,
        commit_sha: String,
    },
}

impl CommitStage {
    pub fn name(&self) -> &'static str {
        match self {
            CommitStage::CreatingBlobs => "Creating blobs",
            CommitStage::CreatingTree { .. } => "Creating tree",
            CommitStage::CreatingCommit { .. } => "Creating commit",
            CommitStage::UpdatingRef { .. } => "Updating ref",
        }
    }

    pub fn is_retry_safe(&self) -> bool {
        !matches!(self, CommitStage::UpdatingRef { .. })
    }
}

/// Every object produced for one commit, parent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitObjectChain {
    pub parent_sha: String,
    pub blobs: Vec<TreeEntry>,
    pub tree_sha: String,
    pub commit_sha: String,
    /// SHA the branch ref points at after the update
    pub ref_sha: String,
}

enum Step {
    Next(CommitStage),
    Done(GitObjectChain),
}

/// Lands the changed files as one commit on the gated branch.
pub struct CommitBuilder<'a> {
    config: &'a Config,
    workspace: &'a Path,
    host: &'a dyn GitHost,
    repository: &'a dyn Repository,
    logger: &'a Logger,
    output: &'a ActionOutput,
}

impl<'a> CommitBuilder<'a> {
    pub fn new(
        config: &'a Config,
        workspace: &'a Path,
        host: &'a dyn GitHost,
        repository: &'a dyn Repository,
        logger: &'a Logger,
        output: &'a ActionOutput,
    ) -> Self {
        CommitBuilder {
            config,
            workspace,
            host,
            repository,
            logger,
            output,
        }
    }

    /// Commit `changed_files` (paths relative to the workspace).
    ///
    /// # Returns
    /// * `Ok(true)` - Committed, or nothing to do (no files, commit disabled)
    /// * `Ok(false)` - The branch gate refused the push
    /// * `Err` - A remote call failed; the run must fail
    pub async fn commit(&self, changed_files: &[String], context: &TriggerContext) -> Result<bool> {
        if changed_files.is_empty() {
            self.logger.info("No update required.");
            return Ok(true);
        }

        self.logger.start_group("Committing...");
        if self.config.commit_disabled {
            self.logger.info("Commit is disabled.");
            self.logger.end_group();
            return Ok(true);
        }

        let branch = match get_update_branch(context, self.config, self.repository, self.logger) {
            Ok(branch) => branch,
            Err(failure) => {
                self.report_gate_failure(&failure);
                self.logger.end_group();
                return Ok(false);
            }
        };
        self.logger.end_group();

        self.build(changed_files, &context.sha, &branch).await?;
        Ok(true)
    }

    fn report_gate_failure(&self, failure: &GateFailure) {
        self.logger.warn(&failure.to_string());
    }

    /// Run the state machine from blob creation to the ref update.
    pub async fn build(
        &self,
        changed_files: &[String],
        parent_sha: &str,
        branch: &str,
    ) -> Result<GitObjectChain> {
        let mut stage = CommitStage::CreatingBlobs;
        loop {
            let name = stage.name();
            let retry_safe = stage.is_retry_safe();
            let step = match self.step(stage, changed_files, parent_sha, branch).await {
                Ok(step) => step,
                Err(e) => {
                    self.logger.end_group();
                    return Err(match e {
                        ActionError::Host(source) => ActionError::Commit {
                            stage: name,
                            retry_safe,
                            source,
                        },
                        other => other,
                    });
                }
            };

            stage = match step {
                Step::Next(next) => next,
                Step::Done(chain) => return Ok(chain),
            };
        }
    }

    async fn step(
        &self,
        stage: CommitStage,
        changed_files: &[String],
        parent_sha: &str,
        branch: &str,
    ) -> Result<Step> {
        match stage {
            CommitStage::CreatingBlobs => {
                self.logger.start_group("Creating blobs...");
                let blobs = self.create_blobs(changed_files).await?;
                Ok(Step::Next(CommitStage::CreatingTree { blobs }))
            }
            CommitStage::CreatingTree { blobs } => {
                self.logger.start_group("Creating tree...");
                let parent = self.host.get_commit(parent_sha).await?;
                let tree_sha = self.host.create_tree(&parent.tree_sha, &blobs).await?;
                Ok(Step::Next(CommitStage::CreatingCommit { blobs, tree_sha }))
            }
            CommitStage::CreatingCommit { blobs, tree_sha } => {
                let commit_sha = self
                    .host
                    .create_commit(
                        &self.config.commit_message,
                        &tree_sha,
                        &[parent_sha.to_string()],
                    )
                    .await?;
                self.logger
                    .start_group(&format!("Creating commit... [{}]", commit_sha));
                Ok(Step::Next(CommitStage::UpdatingRef {
                    blobs,
                    tree_sha,
                    commit_sha,
                }))
            }
            CommitStage::UpdatingRef {
                blobs,
                tree_sha,
                commit_sha,
            } => {
                let ref_name = format!("heads/{}", branch);
                let ref_sha = self.host.update_ref(&ref_name, &commit_sha, true).await?;
                self.logger
                    .start_group(&format!("Updating ref... [{}] [{}]", ref_name, ref_sha));
                self.output
                    .export_variable(self.logger, SHA_VARIABLE, &ref_sha)?;
                self.logger.end_group();
                self.output.set_output(self.logger, SHA_OUTPUT, &ref_sha)?;

                Ok(Step::Done(GitObjectChain {
                    parent_sha: parent_sha.to_string(),
                    blobs,
                    tree_sha,
                    commit_sha,
                    ref_sha,
                }))
            }
        }
    }

    /// Upload every file as a blob; uploads run concurrently and all must finish.
    async fn create_blobs(&self, changed_files: &[String]) -> Result<Vec<TreeEntry>> {
        let uploads = changed_files.iter().map(|file| async move {
            let content = tokio::fs::read(self.workspace.join(file)).await?;
            let sha = self.host.create_blob(&content).await?;
            Ok::<_, ActionError>(TreeEntry::blob(file.as_str(), sha))
        });
        try_join_all(uploads).await
    }
}
