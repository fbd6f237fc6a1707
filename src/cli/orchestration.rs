//! Main workflow orchestration logic
//!
//! Keeps the end-to-end release flow apart from argument parsing so it can be
//! driven programmatically, with any [`GitHost`] and [`Repository`].

use std::path::{Path, PathBuf};

use crate::commit::CommitBuilder;
use crate::config::Config;
use crate::context::TriggerContext;
use crate::domain::is_valid_context;
use crate::error::Result;
use crate::git::Repository;
use crate::host::{GitHost, GitHubClient, DEFAULT_API_BASE};
use crate::ui::{ActionOutput, Logger};
use crate::updater::update_package_version;
use crate::version::resolve_version;

/// Arguments for the release workflow
///
/// Mirrors the CLI Args without depending on clap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowArgs {
    /// Path to custom config file
    pub config_path: Option<String>,

    /// Checked-out working tree holding the files to update
    pub workspace: PathBuf,

    /// API token; every remote call fails with an auth error without one
    pub token: Option<String>,

    /// Base URL of the REST API
    pub api_url: Option<String>,
}

/// Result of a workflow run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowResult {
    /// The version written, when the trigger named a valid one
    pub version: Option<String>,

    /// Paths changed in the workspace, one entry per rule that changed them
    pub changed_files: Vec<String>,

    /// False when the branch gate refused the push
    pub committed: bool,
}

/// Builds the GitHub client for the triggering repository.
pub fn github_client(args: &WorkflowArgs, context: &TriggerContext) -> GitHubClient {
    let api_base = args
        .api_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_API_BASE);

    GitHubClient::with_api_base(
        args.token.clone(),
        &context.repo_owner,
        &context.repo_name,
        api_base,
    )
}

/// Main release workflow
///
/// 1. Resolve the version from the trigger
/// 2. Write it into the configured files
/// 3. Commit the changed files through the host's git data API
///
/// A trigger that names no valid version is not an error: nothing is
/// updated and nothing is committed.
pub async fn run_release_workflow(
    context: &TriggerContext,
    config: &Config,
    workspace: &Path,
    host: &dyn GitHost,
    repository: &dyn Repository,
    logger: &Logger,
    output: &ActionOutput,
) -> Result<WorkflowResult> {
    let candidate = resolve_version(context, config);
    let version = is_valid_context(context, config).then_some(candidate.version);

    let changed_files = update_package_version(context, config, workspace, logger)?;

    let committed = CommitBuilder::new(config, workspace, host, repository, logger, output)
        .commit(&changed_files, context)
        .await?;

    Ok(WorkflowResult {
        version,
        changed_files,
        committed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{EventName, Payload};

    fn context() -> TriggerContext {
        TriggerContext {
            event_name: EventName::Push,
            git_ref: "refs/tags/v1.2.3".to_string(),
            sha: "abc".to_string(),
            repo_owner: "hello".to_string(),
            repo_name: "world".to_string(),
            payload: Payload::default(),
        }
    }

    fn args(api_url: Option<&str>) -> WorkflowArgs {
        WorkflowArgs {
            config_path: None,
            workspace: PathBuf::from("."),
            token: Some(String::new()),
            api_url: api_url.map(str::to_string),
        }
    }

    #[test]
    fn test_github_client_targets_trigger_repository() {
        let client = github_client(&args(None), &context());
        assert_eq!(client.owner(), "hello");
        assert_eq!(client.repo(), "world");
    }

    #[test]
    fn test_empty_api_url_falls_back_to_default() {
        let client = github_client(&args(Some("")), &context());
        assert_eq!(client.api_base(), DEFAULT_API_BASE);

        let client = github_client(&args(Some("http://localhost:8080")), &context());
        assert_eq!(client.api_base(), "http://localhost:8080");
    }
}
