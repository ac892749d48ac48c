//! # Prelude
//!
//! Re-exports commonly used types and traits for convenience.
//!
//! ```rust
//! use commit_status_notifier::prelude::*;
//! ```

pub use crate::config::NotifierConfig;
pub use crate::error::{NotifierError, TransportError};
pub use crate::event::{Event, ObjectReference, Severity};
pub use crate::notifier::{
    create_notifier, Bitbucket, CommitStatusClient, CommitStatusRequest, GitHub, Notifier,
    ProviderType, RepositoryId,
};
pub use crate::redact::{
    redact_secrets_from_error, redact_token_from_error, redacted_message, redacted_secrets_message,
};
