//! # Severity Mapping
//!
//! Each provider owns a constant table translating event severities into the
//! provider's commit status states. Severities missing from a table are
//! rejected instead of being guessed.

use crate::error::NotifierError;
use crate::event::Severity;

/// Finite severity to commit status state table for one provider
#[derive(Debug, Clone, Copy)]
pub struct StateTable {
    provider: &'static str,
    entries: &'static [(Severity, &'static str)],
}

impl StateTable {
    #[must_use]
    pub const fn new(provider: &'static str, entries: &'static [(Severity, &'static str)]) -> Self {
        Self { provider, entries }
    }

    /// Provider state for `severity`
    ///
    /// # Errors
    /// Returns `UnsupportedSeverity` when the table has no entry for `severity`.
    pub fn state_for(&self, severity: &Severity) -> Result<&'static str, NotifierError> {
        self.entries
            .iter()
            .find(|(s, _)| s == severity)
            .map(|(_, state)| *state)
            .ok_or_else(|| NotifierError::unsupported_severity(severity, self.provider))
    }

    #[must_use]
    pub fn provider(&self) -> &'static str {
        self.provider
    }
}

const BITBUCKET_ENTRIES: &[(Severity, &str)] =
    &[(Severity::Info, "SUCCESSFUL"), (Severity::Error, "FAILED")];

const GITHUB_ENTRIES: &[(Severity, &str)] =
    &[(Severity::Info, "success"), (Severity::Error, "failure")];

/// Bitbucket build status states
pub const BITBUCKET_STATES: StateTable = StateTable::new("bitbucket", BITBUCKET_ENTRIES);

/// GitHub commit status states
pub const GITHUB_STATES: StateTable = StateTable::new("github", GITHUB_ENTRIES);
