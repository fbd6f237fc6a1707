//! Domain logic - pure trigger resolution rules independent of git and the network

pub mod branch;

pub use branch::{is_valid_branch, is_valid_context, resolve_branch, BranchCandidate};
