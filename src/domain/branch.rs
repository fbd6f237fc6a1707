use crate::config::Config;
use crate::context::TriggerContext;
use crate::version::{is_valid_tag_name, next_version, VersionCandidate};

/// A branch name with its validity as a release branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCandidate {
    pub name: String,
    pub valid: bool,
}

impl BranchCandidate {
    /// Resolve the branch implicated by the trigger and validate it
    pub fn resolve(context: &TriggerContext, config: &Config) -> Self {
        let name = resolve_branch(context);
        let valid = is_valid_branch(&name, config);
        BranchCandidate { name, valid }
    }
}

/// Branch name implicated by the trigger.
///
/// Pull requests use the head branch verbatim; everything else uses the ref
/// with `refs/heads/` or `refs/tags/` removed.
pub fn resolve_branch(context: &TriggerContext) -> String {
    if context.is_pull_request() {
        return context
            .payload
            .pull_request_head_ref
            .clone()
            .unwrap_or_default();
    }

    context.ref_name().to_string()
}

/// Remainder of the branch name once the configured prefix is removed.
pub fn version_from_branch<'a>(branch: &'a str, config: &Config) -> &'a str {
    if config.branch_prefix.is_empty() {
        return branch;
    }
    branch.strip_prefix(&config.branch_prefix).unwrap_or(branch)
}

/// Whether `branch` is a release branch: prefix configured, present, and
/// followed by a valid version.
pub fn is_valid_branch(branch: &str, config: &Config) -> bool {
    !config.branch_prefix.is_empty()
        && branch.starts_with(&config.branch_prefix)
        && VersionCandidate::from_branch_remainder(version_from_branch(branch, config)).valid
}

/// Single gate deciding whether any update work proceeds.
pub fn is_valid_context(context: &TriggerContext, config: &Config) -> bool {
    next_version(config).is_some()
        || context
            .tag_name()
            .is_some_and(|tag| is_valid_tag_name(tag, config))
        || is_valid_branch(&resolve_branch(context), config)
}
