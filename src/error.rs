//! # Errors
//!
//! Error types for commit status notification.
//!
//! Construction-time errors (`EmptyToken`, `InvalidAddress`, `InvalidIdentity`,
//! `InvalidCredentialFormat`, `ClientSetup`) abort notifier creation. Per-event errors are
//! returned to the caller and never affect other events. None of the variants
//! carry the provider token in their rendered text, with the exception of
//! transport errors whose body comes from the remote API; those must go
//! through [`crate::redact::redact_token_from_error`] before being surfaced.

use crate::constants::REDACTION_FAILED_MESSAGE;
use crate::event::Severity;
use thiserror::Error;

/// Error returned by notifier construction and by [`crate::notifier::Notifier::post`]
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("{provider} token cannot be empty")]
    EmptyToken { provider: &'static str },

    #[error("invalid git address '{address}': {reason}")]
    InvalidAddress {
        address: String,
        reason: &'static str,
    },

    #[error("invalid repository id '{id}', expected <owner>/<repo>")]
    InvalidIdentity { id: String },

    #[error("invalid token format, expected to be <user>:<password>")]
    InvalidCredentialFormat,

    #[error("failed to set up {provider} API client")]
    ClientSetup {
        provider: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("missing revision metadata")]
    MissingRevision,

    #[error("invalid revision '{revision}'")]
    InvalidRevision { revision: String },

    #[error("cannot convert severity '{severity}' to a {provider} commit status state")]
    UnsupportedSeverity {
        severity: String,
        provider: &'static str,
    },

    #[error("failed to post commit status to {provider}")]
    Transport {
        provider: &'static str,
        #[source]
        source: TransportError,
    },

    #[error("{}", REDACTION_FAILED_MESSAGE)]
    RedactionFailed,
}

impl NotifierError {
    /// Check if this error can only occur while building a notifier
    #[must_use]
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            NotifierError::EmptyToken { .. }
                | NotifierError::InvalidAddress { .. }
                | NotifierError::InvalidIdentity { .. }
                | NotifierError::InvalidCredentialFormat
                | NotifierError::ClientSetup { .. }
        )
    }

    /// Short name of the stage that failed, used as a metrics label
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            NotifierError::EmptyToken { .. } | NotifierError::InvalidCredentialFormat => {
                "credentials"
            }
            NotifierError::InvalidAddress { .. } | NotifierError::InvalidIdentity { .. } => {
                "address"
            }
            NotifierError::ClientSetup { .. } => "client",
            NotifierError::MissingRevision | NotifierError::InvalidRevision { .. } => "revision",
            NotifierError::UnsupportedSeverity { .. } => "severity",
            NotifierError::Transport { .. } => "transport",
            NotifierError::RedactionFailed => "redaction",
        }
    }

    pub(crate) fn unsupported_severity(severity: &Severity, provider: &'static str) -> Self {
        NotifierError::UnsupportedSeverity {
            severity: severity.as_str().to_string(),
            provider,
        }
    }
}

/// Failure of the commit status API call itself
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid API base URL '{url}'")]
    InvalidBaseUrl { url: String },
}
