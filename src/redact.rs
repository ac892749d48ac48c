//! # Token Redaction
//!
//! Removes a provider token from error text before the error is logged or
//! handed to anything outside the notifier.
//!
//! Tokens are untrusted input: they may contain regex meta characters or may
//! not be valid UTF-8 at all. The token is escaped and matched literally; when
//! it cannot be matched safely the whole error is replaced by a placeholder so
//! the original text (which may contain the token) is never surfaced.

use crate::constants::REDACTION_MASK;
use crate::error::NotifierError;
use crate::observability::metrics;
use regex::{NoExpand, Regex};
use tracing::{debug, error};

/// Replace every occurrence of `token` in the rendered error with `*****`
///
/// The error is rendered with its full cause chain (`{:#}`), so tokens echoed
/// back by a transport error's source are masked too. An empty token returns
/// the error text unchanged.
///
/// Returns a [`NotifierError::RedactionFailed`] placeholder when `token` is not
/// valid UTF-8, cannot be compiled into a literal pattern, or would still be
/// present after masking.
#[must_use]
pub fn redact_token_from_error(err: &anyhow::Error, token: &[u8]) -> anyhow::Error {
    redact_secrets_from_error(err, &[token])
}

/// Redact every secret in `secrets` from the rendered error, in order
///
/// Used when a token has parts that may be echoed on their own, such as the
/// password of a `<user>:<password>` token.
#[must_use]
pub fn redact_secrets_from_error(err: &anyhow::Error, secrets: &[&[u8]]) -> anyhow::Error {
    match redact_all(format!("{err:#}"), secrets) {
        Ok(message) => anyhow::Error::msg(message),
        Err(e) => e.into(),
    }
}

/// Redact `token` from `err` and render the result
///
/// Convenience for log statements and response bodies.
#[must_use]
pub fn redacted_message(err: &anyhow::Error, token: &[u8]) -> String {
    format!("{:#}", redact_token_from_error(err, token))
}

/// Redact `secrets` from `err` and render the result
#[must_use]
pub fn redacted_secrets_message(err: &anyhow::Error, secrets: &[&[u8]]) -> String {
    format!("{:#}", redact_secrets_from_error(err, secrets))
}

/// Redact `secrets` from plain text, such as a log field taken from an event
#[must_use]
pub fn redact_secrets_in_text(text: &str, secrets: &[&[u8]]) -> String {
    redact_all(text.to_string(), secrets).unwrap_or_else(|e| e.to_string())
}

fn redact_all(message: String, secrets: &[&[u8]]) -> Result<String, NotifierError> {
    secrets
        .iter()
        .try_fold(message, |message, secret| redact_one(message, secret))
}

fn redact_one(message: String, token: &[u8]) -> Result<String, NotifierError> {
    if token.is_empty() {
        return Ok(message);
    }

    let Ok(token) = std::str::from_utf8(token) else {
        error!("Error redacting token from error message: token is not valid UTF-8");
        metrics::increment_redaction_failures();
        return Err(NotifierError::RedactionFailed);
    };

    let pattern = match Regex::new(&regex::escape(token)) {
        Ok(pattern) => pattern,
        Err(e) => {
            error!("Error redacting token from error message: {}", compile_error_kind(&e));
            metrics::increment_redaction_failures();
            return Err(NotifierError::RedactionFailed);
        }
    };

    let occurrences = pattern.find_iter(&message).count();
    if occurrences == 0 {
        return Ok(message);
    }

    let redacted = pattern.replace_all(&message, NoExpand(REDACTION_MASK));
    // A token made of mask characters, or one that overlaps the mask, survives replacement
    if pattern.is_match(&redacted) {
        error!("Error redacting token from error message: token is still present after masking");
        metrics::increment_redaction_failures();
        return Err(NotifierError::RedactionFailed);
    }

    debug!("Redacted {} token occurrence(s) from error message", occurrences);
    metrics::increment_redactions();

    Ok(redacted.into_owned())
}

fn compile_error_kind(e: &regex::Error) -> &'static str {
    match e {
        regex::Error::CompiledTooBig(_) => "pattern exceeds size limit",
        _ => "pattern failed to compile",
    }
}
