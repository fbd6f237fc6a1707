//! Decides which branch, if any, may receive the version commit.

use std::sync::OnceLock;

use regex::Regex;

use crate::boundary::GateFailure;
use crate::config::Config;
use crate::context::TriggerContext;
use crate::domain::{is_valid_branch, is_valid_context, resolve_branch};
use crate::git::Repository;
use crate::ui::Logger;

fn remote_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^remotes/[^/]+/").expect("remote prefix pattern is valid"))
}

/// Strip a leading `remotes/<remote>/` from a branch name.
pub fn strip_remote_prefix(branch: &str) -> &str {
    match remote_prefix().find(branch) {
        Some(m) => &branch[m.end()..],
        None => branch,
    }
}

/// Resolve the branch the commit should land on.
///
/// Pushes to a release branch target that branch directly, even without a
/// default branch in the payload. Pull requests (with a branch prefix
/// configured) target their head branch. Tag triggers target the default branch,
/// and only when the tagged commit is reachable from it. A failing containment
/// query counts as "not reachable".
pub fn get_update_branch(
    context: &TriggerContext,
    config: &Config,
    repository: &dyn Repository,
    logger: &Logger,
) -> Result<String, GateFailure> {
    if !is_valid_context(context, config) {
        return Err(GateFailure::InvalidContext);
    }

    if !context.is_pull_request() && context.tag_name().is_none() {
        let branch = resolve_branch(context);
        if is_valid_branch(&branch, config) {
            return Ok(branch);
        }
    }

    let default_branch = context
        .payload
        .default_branch
        .as_deref()
        .ok_or(GateFailure::MissingDefaultBranch)?;

    if context.is_pull_request() && !config.branch_prefix.is_empty() {
        return Ok(resolve_branch(context));
    }

    let rev = context.tag_name().unwrap_or(context.sha.as_str());
    logger.command(&repository.describe_query(rev));
    let branches = match repository.list_branches_containing(rev) {
        Ok(branches) => branches,
        Err(e) => {
            logger.warn(&format!("Branch query failed: {}", e));
            Vec::new()
        }
    };
    for branch in &branches {
        logger.detail(branch);
    }

    if branches
        .iter()
        .any(|branch| strip_remote_prefix(branch) == default_branch)
    {
        Ok(default_branch.to_string())
    } else {
        Err(GateFailure::NotDefaultBranch {
            default_branch: default_branch.to_string(),
        })
    }
}
