//! # Notifier Modules
//!
//! Commit status notifiers for different git hosting providers.
//!
//! Each provider implements:
//! - `Notifier` for turning events into commit statuses
//! - `CommitStatusClient` for the provider's REST API (swappable for tests)

use crate::constants::{PROGRESSING_REASON, REVISION_METADATA_KEY};
use crate::error::{NotifierError, TransportError};
use crate::event::Event;
use crate::observability::metrics;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, Instrument};
use url::Url;

pub mod address;
pub mod bitbucket;
pub mod credentials;
pub mod format;
pub mod github;
pub mod revision;
pub mod severity;

pub use address::{parse_git_address, RepositoryId};
pub use bitbucket::{Bitbucket, BitbucketClient};
pub use credentials::{password_bytes, Credential};
pub use format::format_name_and_description;
pub use github::{GitHub, GitHubClient};
pub use revision::parse_revision;
pub use severity::{StateTable, BITBUCKET_STATES, GITHUB_STATES};

/// Notifier trait for git hosting providers
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post the event as a commit status
    ///
    /// Returns `Ok(())` without calling the provider for events that are not
    /// reported (in-progress reconciliations). Transport errors are returned
    /// unmodified; redacting them is up to the caller.
    async fn post(&self, event: &Event) -> Result<(), NotifierError>;

    /// Provider name (e.g., "bitbucket", "github")
    fn provider(&self) -> &'static str;
}

/// Parameters of a single commit status API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitStatusRequest {
    pub repository: RepositoryId,
    pub revision: String,
    pub state: &'static str,
    pub key: String,
    pub name: String,
    pub description: String,
    pub url: String,
}

/// Provider commit status API
#[async_trait]
pub trait CommitStatusClient: Send + Sync + fmt::Debug {
    /// Create (or replace) the status identified by `request.key` on `request.revision`
    async fn create_commit_status(&self, request: &CommitStatusRequest)
        -> Result<(), TransportError>;
}

/// Supported providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Bitbucket,
    GitHub,
}

impl ProviderType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Bitbucket => "bitbucket",
            ProviderType::GitHub => "github",
        }
    }
}

impl FromStr for ProviderType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bitbucket" => Ok(ProviderType::Bitbucket),
            "github" => Ok(ProviderType::GitHub),
            other => Err(anyhow::anyhow!(
                "unsupported provider '{other}', expected one of: bitbucket, github"
            )),
        }
    }
}

/// Build a notifier for `provider` talking to the provider's REST API
///
/// `api_url` overrides the provider's default API base URL.
///
/// # Errors
/// Returns a construction error when the token, address or identity is invalid,
/// or when the HTTP client cannot be built.
pub fn create_notifier(
    provider: ProviderType,
    address: &str,
    token: &str,
    api_url: Option<&str>,
    timeout: Duration,
) -> anyhow::Result<Arc<dyn Notifier>> {
    let notifier: Arc<dyn Notifier> = match provider {
        ProviderType::Bitbucket => Arc::new(Bitbucket::new(address, token, api_url, timeout)?),
        ProviderType::GitHub => Arc::new(GitHub::new(address, token, api_url, timeout)?),
    };
    Ok(notifier)
}

/// Parse an API base URL that request paths can be appended to
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, TransportError> {
    let invalid = || TransportError::InvalidBaseUrl {
        url: base_url.to_string(),
    };
    let url = Url::parse(base_url).map_err(|_parse_error| invalid())?;
    if url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url)
}

/// Append `segments` to the path of `base`
///
/// Each segment is percent-encoded, so `/`, `?` and `#` inside owner, repo or
/// revision cannot change the endpoint.
pub(crate) fn endpoint_url(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Shared per-event steps: filter, revision, state, formatting
///
/// Returns `None` for events that must not produce a commit status.
pub(crate) fn build_request(
    event: &Event,
    repository: &RepositoryId,
    states: &StateTable,
    url: &str,
) -> Result<Option<CommitStatusRequest>, NotifierError> {
    if event.reason == PROGRESSING_REASON {
        return Ok(None);
    }

    let revision = event
        .metadata_value(REVISION_METADATA_KEY)
        .ok_or(NotifierError::MissingRevision)?;
    let revision = parse_revision(revision)?;
    let state = states.state_for(&event.severity)?;
    let (name, description) = format_name_and_description(event);

    Ok(Some(CommitStatusRequest {
        repository: repository.clone(),
        revision,
        state,
        key: name.clone(),
        name,
        description,
        url: url.to_string(),
    }))
}

/// Build the request for `event` and send it through `client`
///
/// Records notification metrics for the provider that owns `states`.
pub(crate) async fn post_commit_status(
    client: &dyn CommitStatusClient,
    event: &Event,
    repository: &RepositoryId,
    states: &StateTable,
    url: &str,
) -> Result<(), NotifierError> {
    let provider = states.provider();
    let span = info_span!(
        "notifier.commit_status.post",
        provider = provider,
        repository.owner = %repository.owner,
        repository.name = %repository.repo,
        event.reason = %event.reason,
        revision = tracing::field::Empty,
    );
    let span_clone = span.clone();

    async move {
        let start = Instant::now();
        let request = match build_request(event, repository, states, url) {
            Ok(Some(request)) => request,
            Ok(None) => {
                debug!("Skipping {} event, not reported as a commit status", event.reason);
                metrics::record_notification(provider, "skipped", start.elapsed().as_secs_f64());
                return Ok(());
            }
            Err(e) => {
                metrics::record_notification(provider, "failed", start.elapsed().as_secs_f64());
                return Err(e);
            }
        };
        span_clone.record("revision", request.revision.as_str());

        match client.create_commit_status(&request).await {
            Ok(()) => {
                info!(
                    "Posted {} commit status '{}' for {} at {}",
                    provider,
                    request.state,
                    repository.full_name(),
                    request.revision
                );
                metrics::record_notification(provider, "sent", start.elapsed().as_secs_f64());
                Ok(())
            }
            Err(source) => {
                metrics::record_notification(provider, "failed", start.elapsed().as_secs_f64());
                Err(NotifierError::Transport { provider, source })
            }
        }
    }
    .instrument(span)
    .await
}
