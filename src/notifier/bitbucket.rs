//! # Bitbucket Notifier
//!
//! Reports events as Bitbucket Cloud build statuses.
//!
//! The token is a combined `<user>:<app-password>` string used for basic auth.
//!
//! References:
//! - [Create a build status for a commit](https://developer.atlassian.com/cloud/bitbucket/rest/api-group-commit-statuses/#api-repositories-workspace-repo-slug-commit-commit-statuses-build-post)

use crate::constants::{BITBUCKET_API_URL, BITBUCKET_STATUS_URL, USER_AGENT};
use crate::error::{NotifierError, TransportError};
use crate::event::Event;
use crate::notifier::credentials::Credential;
use crate::notifier::severity::BITBUCKET_STATES;
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

const PROVIDER: &str = "bitbucket";

/// Bitbucket commit status notifier
#[derive(Debug)]
pub struct Bitbucket {
    repository: RepositoryId,
    client: Arc<dyn CommitStatusClient>,
}

impl Bitbucket {
    /// Create a notifier for the repository at `address`
    ///
    /// `api_url` overrides the Bitbucket Cloud API base URL.
    ///
    /// # Errors
    /// Fails when the token is empty or not `<user>:<password>`, when the address
    /// cannot be parsed, or when the HTTP client cannot be built.
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
        let credential = Credential::parse(token)?;

        let client = BitbucketClient::new(
            api_url.unwrap_or(BITBUCKET_API_URL),
            credential,
            timeout,
        )
        .map_err(|source| NotifierError::ClientSetup {
            provider: PROVIDER,
            source,
        })?;

        Ok(Self {
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
        Ok(Self {
            repository: RepositoryId::from_address(address)?,
            client,
        })
    }

    #[must_use]
    pub fn repository(&self) -> &RepositoryId {
        &self.repository
    }
}

#[async_trait]
impl Notifier for Bitbucket {
    async fn post(&self, event: &Event) -> Result<(), NotifierError> {
        post_commit_status(
            self.client.as_ref(),
            event,
            &self.repository,
            &BITBUCKET_STATES,
            BITBUCKET_STATUS_URL,
        )
        .await
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }
}

/// Build status payload
///
/// API Reference: https://developer.atlassian.com/cloud/bitbucket/rest/api-group-commit-statuses/#api-repositories-workspace-repo-slug-commit-commit-statuses-build-post
#[derive(Debug, Serialize)]
struct BuildStatus<'a> {
    state: &'a str,
    key: &'a str,
    name: &'a str,
    description: &'a str,
    url: &'a str,
}

/// Bitbucket Cloud REST client for build statuses
pub struct BitbucketClient {
    http_client: Client,
    base_url: Url,
    credential: Credential,
}

impl std::fmt::Debug for BitbucketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitbucketClient")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.credential.username())
            .finish_non_exhaustive()
    }
}

impl BitbucketClient {
    /// Create a client for the API at `base_url`
    ///
    /// # Errors
    /// Returns an error if `base_url` is not a valid base URL or the HTTP client
    /// cannot be built.
    pub fn new(
        base_url: &str,
        credential: Credential,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let base_url = parse_base_url(base_url)?;
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            credential,
        })
    }

    fn statuses_url(&self, request: &CommitStatusRequest) -> Url {
        endpoint_url(
            &self.base_url,
            &[
                "2.0",
                "repositories",
                &request.repository.owner,
                &request.repository.repo,
                "commit",
                &request.revision,
                "statuses",
                "build",
            ],
        )
    }
}

#[async_trait]
impl CommitStatusClient for BitbucketClient {
    async fn create_commit_status(
        &self,
        request: &CommitStatusRequest,
    ) -> Result<(), TransportError> {
        let url = self.statuses_url(request);
        debug!("POST {}", url);

        let body = BuildStatus {
            state: request.state,
            key: &request.key,
            name: &request.name,
            description: &request.description,
            url: &request.url,
        };

        let response = self
            .http_client
            .post(url)
            .basic_auth(self.credential.username(), Some(self.credential.password()))
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
