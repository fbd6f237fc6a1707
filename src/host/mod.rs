//! Git hosting service abstraction layer
//!
//! - [github::GitHubClient]: GitHub REST implementation
//! - [mock::MockGitHost]: in-memory implementation for testing

pub mod github;
pub mod mock;
pub mod traits;

pub use github::{GitHubClient, DEFAULT_API_BASE};
pub use mock::{HostCall, MockGitHost};
pub use traits::{CommitObject, GitHost, HostError, TreeEntry};
