//! # Notifier Configuration
//!
//! Provider, repository and server settings loaded from environment variables.
//!
//! | Variable | Default | |
//! |---|---|---|
//! | `NOTIFIER_PROVIDER` | required | `bitbucket` or `github` |
//! | `NOTIFIER_ADDRESS` | required | git remote address of the repository |
//! | `NOTIFIER_TOKEN` | required | provider token (`<user>:<password>` for Bitbucket) |
//! | `NOTIFIER_API_URL` | provider default | API base URL override |
//! | `HTTP_TIMEOUT_SECS` | 15 | timeout of a single commit status call |
//! | `SERVER_PORT` | 9292 | event, metrics and probe port |
//! | `LOG_FORMAT` | json | `json` or `text` |
//! | `LOG_ENABLE_COLOR` | false | ANSI colors for `text` logs |

use crate::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_SERVER_PORT};
use crate::notifier::{password_bytes, ProviderType};
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::time::Duration;
use zeroize::Zeroizing;

/// Notifier process configuration
#[derive(Clone)]
pub struct NotifierConfig {
    pub provider: ProviderType,
    pub address: String,
    /// Raw token bytes; not guaranteed to be valid UTF-8
    token: Zeroizing<Vec<u8>>,
    pub api_url: Option<String>,
    pub http_timeout_secs: u64,
    pub server_port: u16,
    pub log_format: String,
    pub log_enable_color: bool,
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("provider", &self.provider)
            .field("address", &self.address)
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("server_port", &self.server_port)
            .field("log_format", &self.log_format)
            .field("log_enable_color", &self.log_enable_color)
            .finish()
    }
}

impl NotifierConfig {
    /// Load configuration from environment variables with defaults
    ///
    /// # Errors
    /// Returns an error when a required variable is missing or the provider is unknown.
    pub fn from_env() -> Result<Self> {
        Self::from_source(|key| std::env::var_os(key))
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error when a required variable is missing or the provider is unknown.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let var = |key: &str| lookup(key).and_then(|v| v.into_string().ok());
        let required = |key: &str| {
            var(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{key} must be set"))
        };

        let provider = required("NOTIFIER_PROVIDER")?
            .parse::<ProviderType>()
            .context("Invalid NOTIFIER_PROVIDER")?;
        let address = required("NOTIFIER_ADDRESS")?;
        let token = lookup("NOTIFIER_TOKEN")
            .map(OsString::into_encoded_bytes)
            .context("NOTIFIER_TOKEN must be set")?;

        Ok(Self {
            provider,
            address,
            token: Zeroizing::new(token),
            api_url: var("NOTIFIER_API_URL").filter(|v| !v.trim().is_empty()),
            http_timeout_secs: parse_or_default(
                var("HTTP_TIMEOUT_SECS"),
                DEFAULT_HTTP_TIMEOUT_SECS,
            ),
            server_port: parse_or_default(var("SERVER_PORT"), DEFAULT_SERVER_PORT),
            log_format: var("LOG_FORMAT").unwrap_or_else(|| "json".to_string()),
            log_enable_color: var("LOG_ENABLE_COLOR").is_some_and(|v| parse_bool(&v)),
        })
    }

    /// Raw token bytes, used for redaction
    #[must_use]
    pub fn token_bytes(&self) -> &[u8] {
        &self.token
    }

    /// Every secret that must be masked in errors and logs
    ///
    /// The full token, plus the password on its own for Bitbucket, whose API
    /// may echo either.
    #[must_use]
    pub fn redaction_secrets(&self) -> Vec<&[u8]> {
        let mut secrets = vec![self.token_bytes()];
        if self.provider == ProviderType::Bitbucket {
            secrets.extend(password_bytes(&self.token));
        }
        secrets
    }

    /// Token as text, for authenticating to the provider
    ///
    /// # Errors
    /// Returns an error when the token is not valid UTF-8.
    pub fn token(&self) -> Result<&str> {
        std::str::from_utf8(&self.token).context("NOTIFIER_TOKEN is not valid UTF-8")
    }

    /// Get HTTP timeout duration
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Parse a variable or fall back to `default` when unset or malformed
fn parse_or_default<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn parse_bool(value: &str) -> bool {
    let v_lower = value.to_lowercase();
    v_lower == "true" || v_lower == "1" || v_lower == "yes" || v_lower == "on"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), OsString::from(*v)))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = NotifierConfig::from_source(source(&[
            ("NOTIFIER_PROVIDER", "bitbucket"),
            ("NOTIFIER_ADDRESS", "git@bitbucket.org:myorg/myrepo.git"),
            ("NOTIFIER_TOKEN", "user:password"),
        ]))
        .unwrap();

        assert_eq!(config.provider, ProviderType::Bitbucket);
        assert_eq!(config.token().unwrap(), "user:password");
        assert_eq!(config.server_port, DEFAULT_SERVER_PORT);
        assert_eq!(config.http_timeout(), Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
        assert_eq!(config.log_format, "json");
        assert!(!config.log_enable_color);
        assert!(config.api_url.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = NotifierConfig::from_source(source(&[
            ("NOTIFIER_PROVIDER", "GitHub"),
            ("NOTIFIER_ADDRESS", "https://github.com/foo/bar"),
            ("NOTIFIER_TOKEN", "ghp_token"),
            ("NOTIFIER_API_URL", "http://localhost:8080"),
            ("HTTP_TIMEOUT_SECS", "3"),
            ("SERVER_PORT", "not-a-port"),
            ("LOG_ENABLE_COLOR", "yes"),
        ]))
        .unwrap();

        assert_eq!(config.provider, ProviderType::GitHub);
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.http_timeout_secs, 3);
        assert_eq!(config.server_port, DEFAULT_SERVER_PORT);
        assert!(config.log_enable_color);
    }

    #[test]
    fn test_missing_required_variable() {
        let err = NotifierConfig::from_source(source(&[("NOTIFIER_PROVIDER", "github")]))
            .unwrap_err();
        assert!(err.to_string().contains("NOTIFIER_ADDRESS"));
    }

    #[test]
    fn test_unknown_provider() {
        let err = NotifierConfig::from_source(source(&[
            ("NOTIFIER_PROVIDER", "gitea"),
            ("NOTIFIER_ADDRESS", "https://gitea.example.com/foo/bar"),
            ("NOTIFIER_TOKEN", "token"),
        ]))
        .unwrap_err();
        assert!(format!("{err:#}").contains("unsupported provider 'gitea'"));
    }

    #[test]
    fn test_redaction_secrets() {
        let bitbucket = NotifierConfig::from_source(source(&[
            ("NOTIFIER_PROVIDER", "bitbucket"),
            ("NOTIFIER_ADDRESS", "git@bitbucket.org:myorg/myrepo.git"),
            ("NOTIFIER_TOKEN", "ci-bot:app-password"),
        ]))
        .unwrap();
        assert_eq!(
            bitbucket.redaction_secrets(),
            vec![&b"ci-bot:app-password"[..], &b"app-password"[..]]
        );

        let github = NotifierConfig::from_source(source(&[
            ("NOTIFIER_PROVIDER", "github"),
            ("NOTIFIER_ADDRESS", "https://github.com/foo/bar"),
            ("NOTIFIER_TOKEN", "ghp_token"),
        ]))
        .unwrap();
        assert_eq!(github.redaction_secrets(), vec![&b"ghp_token"[..]]);
    }

    #[test]
    fn test_debug_hides_token() {
        let config = NotifierConfig::from_source(source(&[
            ("NOTIFIER_PROVIDER", "github"),
            ("NOTIFIER_ADDRESS", "https://github.com/foo/bar"),
            ("NOTIFIER_TOKEN", "ghp_supersecret"),
        ]))
        .unwrap();
        assert!(!format!("{config:?}").contains("ghp_supersecret"));
    }
}
