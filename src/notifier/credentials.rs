//! # Credentials
//!
//! Providers that authenticate with basic auth receive a single combined
//! token in the form `<user>:<password>`. Parsing happens once, when the
//! notifier is built, so malformed tokens fail at startup.

use crate::constants::CREDENTIAL_SEPARATOR;
use crate::error::NotifierError;
use std::fmt;
use zeroize::Zeroizing;

/// Username and password for basic auth
#[derive(Clone)]
pub struct Credential {
    username: String,
    password: Zeroizing<String>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credential {
    /// Parse a combined `<user>:<password>` token
    ///
    /// # Errors
    /// Returns `InvalidCredentialFormat` unless the token contains exactly one separator.
    pub fn parse(token: &str) -> Result<Self, NotifierError> {
        let mut parts = token.split(CREDENTIAL_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(username), Some(password), None) => Ok(Self {
                username: username.to_string(),
                password: Zeroizing::new(password.to_string()),
            }),
            _ => Err(NotifierError::InvalidCredentialFormat),
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Password part of a raw `<user>:<password>` token
///
/// Returns `None` unless the token has exactly one separator and a non-empty
/// password. Works on raw bytes so tokens that are not UTF-8 still yield one.
#[must_use]
pub fn password_bytes(token: &[u8]) -> Option<&[u8]> {
    let separator = CREDENTIAL_SEPARATOR as u8;
    let mut parts = token.split(|b| *b == separator);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(password), None) if !password.is_empty() => Some(password),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_and_password() {
        let credential = Credential::parse("ci-bot:app-password").unwrap();
        assert_eq!(credential.username(), "ci-bot");
        assert_eq!(credential.password(), "app-password");
    }

    #[test]
    fn test_separator_count_must_be_one() {
        for token in ["", "no-separator", "a:b:c"] {
            assert!(
                matches!(
                    Credential::parse(token),
                    Err(NotifierError::InvalidCredentialFormat)
                ),
                "Token '{token}' should be rejected"
            );
        }
    }

    #[test]
    fn test_debug_hides_password() {
        let credential = Credential::parse("ci-bot:s3cr3t").unwrap();
        let rendered = format!("{credential:?}");
        assert!(rendered.contains("ci-bot"));
        assert!(!rendered.contains("s3cr3t"));
    }

    #[test]
    fn test_password_bytes() {
        assert_eq!(password_bytes(b"ci-bot:app-password"), Some(&b"app-password"[..]));
        assert_eq!(password_bytes(b"ci-bot:"), None);
        assert_eq!(password_bytes(b"a:b:c"), None);
        assert_eq!(password_bytes(b"ghp_token"), None);
    }
}
