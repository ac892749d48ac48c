//! # Constants
//!
//! Shared constants used throughout the notifier.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Default HTTP server port for event ingestion, metrics and health probes
pub const DEFAULT_SERVER_PORT: u16 = 9292;

/// Default timeout for a single commit status API call (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Replacement written over every occurrence of a secret token
pub const REDACTION_MASK: &str = "*****";

/// Message of the placeholder error returned when a token cannot be redacted safely
pub const REDACTION_FAILED_MESSAGE: &str = "error redacting token from error message";

/// Event reason for in-progress reconciliations; never reported as a commit status
pub const PROGRESSING_REASON: &str = "Progressing";

/// Event metadata key holding the revision descriptor
pub const REVISION_METADATA_KEY: &str = "revision";

/// Separator between username and password in a combined provider token
pub const CREDENTIAL_SEPARATOR: char = ':';

/// Default Bitbucket Cloud REST API base URL
pub const BITBUCKET_API_URL: &str = "https://api.bitbucket.org";

/// Reference URL attached to every Bitbucket commit status
pub const BITBUCKET_STATUS_URL: &str = "https://bitbucket.org";

/// Default GitHub REST API base URL (github.com)
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Host name of public GitHub
pub const GITHUB_HOST: &str = "github.com";

/// User agent sent with every provider API request
pub const USER_AGENT: &str = concat!("commit-status-notifier/", env!("CARGO_PKG_VERSION"));
