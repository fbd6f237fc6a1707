//! Trigger context of a CI run.
//!
//! A [`TriggerContext`] is resolved once from the runner environment and never
//! mutated afterwards. Only the parts of the event payload this crate reads are
//! kept.

use std::fs;

use serde::Deserialize;

use crate::error::{ActionError, Result};

const TAG_REF_PREFIX: &str = "refs/tags/";
const HEAD_REF_PREFIX: &str = "refs/heads/";

/// Event that triggered the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventName {
    Push,
    PullRequest,
    Other(String),
}

impl EventName {
    pub fn parse(name: &str) -> Self {
        match name {
            "push" => EventName::Push,
            "pull_request" | "pull_request_target" => EventName::PullRequest,
            other => EventName::Other(other.to_string()),
        }
    }
}

/// Fields of the event payload consumed by the resolvers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub default_branch: Option<String>,
    pub pull_request_head_ref: Option<String>,
}

/// Immutable description of what triggered this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerContext {
    pub event_name: EventName,
    pub git_ref: String,
    pub sha: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub payload: Payload,
}

#[derive(Deserialize, Default)]
struct RawEvent {
    repository: Option<RawRepository>,
    pull_request: Option<RawPullRequest>,
}

#[derive(Deserialize)]
struct RawRepository {
    default_branch: Option<String>,
}

#[derive(Deserialize)]
struct RawPullRequest {
    head: Option<RawHead>,
}

#[derive(Deserialize)]
struct RawHead {
    #[serde(rename = "ref")]
    git_ref: Option<String>,
}

impl Payload {
    /// Extracts the consumed fields from a raw webhook event body.
    pub fn from_event_json(json: &str) -> Result<Self> {
        let raw: RawEvent = serde_json::from_str(json)
            .map_err(|e| ActionError::context(format!("Invalid event payload: {}", e)))?;

        Ok(Payload {
            default_branch: raw
                .repository
                .and_then(|r| r.default_branch)
                .filter(|b| !b.is_empty()),
            pull_request_head_ref: raw
                .pull_request
                .and_then(|pr| pr.head)
                .and_then(|h| h.git_ref),
        })
    }
}

impl TriggerContext {
    /// Builds the context from the standard runner variables.
    ///
    /// `GITHUB_EVENT_PATH` is optional; a missing payload file yields an empty payload.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the context from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ActionError::context(format!("{} is not set", name)))
        };

        let repository = required("GITHUB_REPOSITORY")?;
        let (owner, name) = repository.split_once('/').ok_or_else(|| {
            ActionError::context(format!("GITHUB_REPOSITORY '{}' is not owner/name", repository))
        })?;

        let payload = match lookup("GITHUB_EVENT_PATH").filter(|p| !p.is_empty()) {
            Some(path) => match fs::read_to_string(&path) {
                Ok(json) => Payload::from_event_json(&json)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Payload::default(),
                Err(e) => return Err(e.into()),
            },
            None => Payload::default(),
        };

        Ok(TriggerContext {
            event_name: EventName::parse(&required("GITHUB_EVENT_NAME")?),
            git_ref: lookup("GITHUB_REF").unwrap_or_default(),
            sha: required("GITHUB_SHA")?,
            repo_owner: owner.to_string(),
            repo_name: name.to_string(),
            payload,
        })
    }

    pub fn is_pull_request(&self) -> bool {
        self.event_name == EventName::PullRequest
    }

    /// Tag name when the ref is a tag ref.
    pub fn tag_name(&self) -> Option<&str> {
        self.git_ref
            .strip_prefix(TAG_REF_PREFIX)
            .filter(|tag| !tag.is_empty())
    }

    /// Branch or tag name parsed out of the ref.
    pub fn ref_name(&self) -> &str {
        self.git_ref
            .strip_prefix(HEAD_REF_PREFIX)
            .or_else(|| self.git_ref.strip_prefix(TAG_REF_PREFIX))
            .unwrap_or(&self.git_ref)
    }
}
