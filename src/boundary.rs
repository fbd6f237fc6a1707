use std::fmt;

/// Reasons a commit may not be pushed.
/// These are non-fatal refusals reported to the user as warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateFailure {
    /// The trigger names no valid version, so nothing needs updating
    InvalidContext,
    /// The event payload carries no default branch name
    MissingDefaultBranch,
    /// The triggering commit is not reachable from the default branch
    NotDefaultBranch { default_branch: String },
}

impl fmt::Display for GateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateFailure::InvalidContext => write!(f, "No update needed for this trigger."),
            GateFailure::MissingDefaultBranch => write!(f, "Failed to get default branch name."),
            GateFailure::NotDefaultBranch { .. } => write!(f, "This is not default branch."),
        }
    }
}

impl std::error::Error for GateFailure {}
