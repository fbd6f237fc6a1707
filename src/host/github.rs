//! host::github
//!
//! GitHub implementation of the git data API.
//!
//! # Design
//!
//! Uses the REST endpoints under `/repos/{owner}/{repo}/git/`:
//! - `POST blobs` with base64 content
//! - `GET commits/{sha}` for the parent's tree
//! - `POST trees` with a `base_tree`
//! - `POST commits`
//! - `PATCH refs/{ref}` with `force`
//!
//! The API base is configurable for GitHub Enterprise and for tests.

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{CommitObject, GitHost, HostError, TreeEntry};

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "release-bump";

/// GitHub git data API client for one repository.
pub struct GitHubClient {
    client: Client,
    token: Option<String>,
    owner: String,
    repo: String,
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("has_token", &self.token.is_some())
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Serialize)]
struct CreateBlobRequest<'a> {
    content: String,
    encoding: &'a str,
}

#[derive(Serialize)]
struct CreateTreeRequest<'a> {
    base_tree: &'a str,
    tree: &'a [TreeEntry],
}

#[derive(Serialize)]
struct CreateCommitRequest<'a> {
    message: &'a str,
    tree: &'a str,
    parents: &'a [String],
}

#[derive(Serialize)]
struct UpdateRefRequest<'a> {
    sha: &'a str,
    force: bool,
}

#[derive(Deserialize)]
struct ShaResponse {
    sha: String,
}

#[derive(Deserialize)]
struct CommitResponse {
    sha: String,
    tree: ShaResponse,
}

#[derive(Deserialize)]
struct RefResponse {
    object: ShaResponse,
}

#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

impl GitHubClient {
    /// Create a client against the public GitHub API.
    pub fn new(token: Option<String>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self::with_api_base(token, owner, repo, DEFAULT_API_BASE)
    }

    /// Create a client with a custom API base URL (e.g. `https://github.example.com/api/v3`).
    pub fn with_api_base(
        token: Option<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            token: token.filter(|t| !t.is_empty()),
            owner: owner.into(),
            repo: repo.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn headers(&self) -> Result<HeaderMap, HostError> {
        let token = self.token.as_ref().ok_or(HostError::AuthRequired)?;
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| HostError::AuthFailed("Invalid token format".into()))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a git data endpoint.
    fn git_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/git/{}",
            self.api_base, self.owner, self.repo, path
        )
    }

    async fn post<B: Serialize + ?Sized, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, HostError> {
        let response = self
            .client
            .post(self.git_url(path))
            .headers(self.headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| HostError::NetworkError(e.to_string()))?;
        handle_response(response).await
    }
}

/// Handle API response, mapping errors appropriately.
async fn handle_response<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, HostError> {
    let status = response.status();

    if status.is_success() {
        return response.json().await.map_err(|e| HostError::ApiError {
            status: status.as_u16(),
            message: format!("Failed to parse response: {}", e),
        });
    }

    let message = match response.json::<GitHubErrorResponse>().await {
        Ok(err) => err.message,
        Err(_) => "Unknown error".to_string(),
    };

    Err(match status {
        StatusCode::UNAUTHORIZED => HostError::AuthFailed("Invalid or expired token".into()),
        StatusCode::FORBIDDEN => HostError::AuthFailed(format!("Permission denied: {}", message)),
        StatusCode::NOT_FOUND => HostError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => HostError::RateLimited,
        _ if status.is_server_error() => HostError::ApiError {
            status: status.as_u16(),
            message: format!("GitHub server error: {}", message),
        },
        _ => HostError::ApiError {
            status: status.as_u16(),
            message,
        },
    })
}

#[async_trait]
impl GitHost for GitHubClient {
    async fn create_blob(&self, content: &[u8]) -> Result<String, HostError> {
        let request = CreateBlobRequest {
            content: base64::engine::general_purpose::STANDARD.encode(content),
            encoding: "base64",
        };
        let blob: ShaResponse = self.post("blobs", &request).await?;
        Ok(blob.sha)
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitObject, HostError> {
        let response = self
            .client
            .get(self.git_url(&format!("commits/{}", sha)))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| HostError::NetworkError(e.to_string()))?;
        let commit: CommitResponse = handle_response(response).await?;
        Ok(CommitObject {
            sha: commit.sha,
            tree_sha: commit.tree.sha,
        })
    }

    async fn create_tree(
        &self,
        base_tree: &str,
        entries: &[TreeEntry],
    ) -> Result<String, HostError> {
        let request = CreateTreeRequest {
            base_tree,
            tree: entries,
        };
        let tree: ShaResponse = self.post("trees", &request).await?;
        Ok(tree.sha)
    }

    async fn create_commit(
        &self,
        message: &str,
        tree: &str,
        parents: &[String],
    ) -> Result<String, HostError> {
        let request = CreateCommitRequest {
            message,
            tree,
            parents,
        };
        let commit: ShaResponse = self.post("commits", &request).await?;
        Ok(commit.sha)
    }

    async fn update_ref(
        &self,
        ref_name: &str,
        sha: &str,
        force: bool,
    ) -> Result<String, HostError> {
        let response = self
            .client
            .patch(self.git_url(&format!("refs/{}", ref_name)))
            .headers(self.headers()?)
            .json(&UpdateRefRequest { sha, force })
            .send()
            .await
            .map_err(|e| HostError::NetworkError(e.to_string()))?;
        let reference: RefResponse = handle_response(response).await?;
        Ok(reference.object.sha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_url() {
        let client = GitHubClient::with_api_base(
            Some("t".into()),
            "hello",
            "world",
            "https://ghe.example.com/api/v3/",
        );
        assert_eq!(
            client.git_url("refs/heads/master"),
            "https://ghe.example.com/api/v3/repos/hello/world/git/refs/heads/master"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client = GitHubClient::new(Some("secret-token".into()), "hello", "world");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("has_token: true"));
    }

    #[tokio::test]
    async fn test_missing_token_is_auth_required() {
        let client = GitHubClient::new(Some(String::new()), "hello", "world");
        let err = client.create_blob(b"content").await.unwrap_err();
        assert!(matches!(err, HostError::AuthRequired));
    }

    #[test]
    fn test_tree_entry_serializes_type_field() {
        let json = serde_json::to_value(TreeEntry::blob("readme.txt", "abc")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"path": "readme.txt", "mode": "100644", "type": "blob", "sha": "abc"})
        );
    }
}
