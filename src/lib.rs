//! Commit Status Notifier Library
//!
//! Turns GitOps reconciliation events into commit statuses on git hosting
//! providers (Bitbucket, GitHub) and keeps provider tokens out of every error
//! that is logged or returned.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use commit_status_notifier::prelude::*;
//! use std::time::Duration;
//!
//! # async fn run(event: Event) -> anyhow::Result<()> {
//! let token = "ci-bot:app-password";
//! let notifier = Bitbucket::new(
//!     "git@bitbucket.org:myorg/myrepo.git",
//!     token,
//!     None,
//!     Duration::from_secs(15),
//! )?;
//!
//! if let Err(e) = notifier.post(&event).await {
//!     let redacted = redact_token_from_error(&e.into(), token.as_bytes());
//!     tracing::error!("{redacted:#}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod notifier;
pub mod observability;
pub mod prelude;
pub mod redact;
pub mod server;
