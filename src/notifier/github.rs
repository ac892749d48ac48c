//! # GitHub Notifier
//!
//! Reports events as GitHub commit statuses, on github.com or a GitHub
//! Enterprise Server host.
//!
//! References:
//! - [Create a commit status](https://docs.github.com/en/rest/commits/statuses#create-a-commit-status)

use crate::constants::{GITHUB_API_URL, GITHUB_HOST, USER_AGENT};
use crate::error::{NotifierError, TransportError};
use crate::event::Event;
use crate::notifier::severity::GITHUB_STATES;
use crate::notifier::{
    endpoint_url, parse_base_url, post_commit_status, CommitStatusClient, CommitStatusRequest,
    Notifier, RepositoryId,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;
use zeroize::Zeroizing;

const PROVIDER: &str = "github";

/// GitHub rejects descriptions longer than this
const MAX_DESCRIPTION_CHARS: usize = 140;

/// GitHub commit status notifier
#[derive(Debug)]
pub struct GitHub {
    repository: RepositoryId,
    target_url: String,
    client: Arc<dyn CommitStatusClient>,
}

impl GitHub {
    /// Create a notifier for the repository at `address`
    ///
    /// The API base URL is derived from the address host unless `api_url` is set.
    ///
    /// # Errors
    /// Fails when the token is empty, when the address cannot be parsed, or when
    /// the HTTP client cannot be built.
    pub fn new(
        address: &str,
        token: &str,
        api_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, NotifierError> {
        if token.is_empty() {
            return Err(NotifierError::EmptyToken { provider: PROVIDER });
        }
        let repository = RepositoryId::from_address(address)?;

        let api_url = api_url.map_or_else(|| default_api_url(&repository.host), str::to_string);
        let client = GitHubClient::new(&api_url, token, timeout).map_err(|source| {
            NotifierError::ClientSetup {
                provider: PROVIDER,
                source,
            }
        })?;

        Ok(Self {
            target_url: repository_url(&repository),
            repository,
            client: Arc::new(client),
        })
    }

    /// Create a notifier that sends statuses through `client`
    ///
    /// # Errors
    /// Fails when the address cannot be parsed.
    pub fn with_client(
        address: &str,
        client: Arc<dyn CommitStatusClient>,
    ) -> Result<Self, NotifierError> {
        let repository = RepositoryId::from_address(address)?;
        Ok(Self {
            target_url: repository_url(&repository),
            repository,
            client,
        })
    }
}

#[async_trait]
impl Notifier for GitHub {
    async fn post(&self, event: &Event) -> Result<(), NotifierError> {
        post_commit_status(
            self.client.as_ref(),
            event,
            &self.repository,
            &GITHUB_STATES,
            &self.target_url,
        )
        .await
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }
}

fn default_api_url(host: &str) -> String {
    if host == GITHUB_HOST {
        GITHUB_API_URL.to_string()
    } else {
        format!("https://{host}/api/v3")
    }
}

fn repository_url(repository: &RepositoryId) -> String {
    format!(
        "https://{}/{}/{}",
        repository.host, repository.owner, repository.repo
    )
}

/// Commit status payload
///
/// API Reference: https://docs.github.com/en/rest/commits/statuses#create-a-commit-status
#[derive(Debug, Serialize)]
struct CreateStatusRequest<'a> {
    state: &'a str,
    target_url: &'a str,
    description: String,
    context: &'a str,
}

/// GitHub REST client for commit statuses
pub struct GitHubClient {
    http_client: Client,
    base_url: Url,
    token: Zeroizing<String>,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Create a client for the API at `base_url` authenticating with `token`
    ///
    /// # Errors
    /// Returns an error if `base_url` is not a valid base URL or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, TransportError> {
        let base_url = parse_base_url(base_url)?;
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            token: Zeroizing::new(token.to_string()),
        })
    }
}

impl GitHubClient {
    fn statuses_url(&self, request: &CommitStatusRequest) -> Url {
        endpoint_url(
            &self.base_url,
            &[
                "repos",
                &request.repository.owner,
                &request.repository.repo,
                "statuses",
                &request.revision,
            ],
        )
    }
}

#[async_trait]
impl CommitStatusClient for GitHubClient {
    async fn create_commit_status(
        &self,
        request: &CommitStatusRequest,
    ) -> Result<(), TransportError> {
        let url = self.statuses_url(request);
        debug!("POST {}", url);

        let body = CreateStatusRequest {
            state: request.state,
            target_url: &request.url,
            description: truncate_chars(&request.description, MAX_DESCRIPTION_CHARS),
            context: &request.key,
        };

        let response = self
            .http_client
            .post(url)
            .bearer_auth(self.token.as_str())
            .header("accept", "application/vnd.github+json")
            .header("x-github-api-version", "2022-11-28")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
