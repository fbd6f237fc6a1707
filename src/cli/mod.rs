pub mod orchestration;

pub use orchestration::{github_client, run_release_workflow, WorkflowArgs, WorkflowResult};
