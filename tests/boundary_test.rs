use release_bump::boundary::GateFailure;
use release_bump::ui::{Logger, MemoryReporter};
use std::sync::Arc;

// ============================================================================
// GateFailure Display Tests
// ============================================================================

#[test]
fn test_gate_failure_messages() {
    assert_eq!(
        GateFailure::MissingDefaultBranch.to_string(),
        "Failed to get default branch name."
    );
    assert_eq!(
        GateFailure::NotDefaultBranch {
            default_branch: "master".to_string()
        }
        .to_string(),
        "This is not default branch."
    );
    assert_eq!(
        GateFailure::InvalidContext.to_string(),
        "No update needed for this trigger."
    );
}

#[test]
fn test_gate_failure_is_std_error() {
    let failure: Box<dyn std::error::Error> = Box::new(GateFailure::MissingDefaultBranch);
    assert!(failure.source().is_none());
}

// ============================================================================
// Reporting
// ============================================================================

#[test]
fn test_gate_failure_reported_as_warning() {
    let reporter = Arc::new(MemoryReporter::new());
    let logger = Logger::new(reporter.clone());

    logger.warn(&GateFailure::MissingDefaultBranch.to_string());

    assert_eq!(
        reporter.lines(),
        vec!["::warning::Failed to get default branch name."]
    );
}
