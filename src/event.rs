//! # Events
//!
//! Reconciliation events as emitted by GitOps controllers.
//!
//! The JSON layout matches the toolkit event format (camelCase keys, lowercase
//! severity), so events can be posted to the server as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Severity of an event
///
/// Unknown severities deserialize into [`Severity::Other`] so they reach the
/// provider state table and are rejected there as unsupported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Trace,
    Info,
    Error,
    Other(String),
}

impl Severity {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Trace => "trace",
            Severity::Info => "info",
            Severity::Error => "error",
            Severity::Other(other) => other,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        match s {
            "trace" => Severity::Trace,
            "info" => Severity::Info,
            "error" => Severity::Error,
            other => Severity::Other(other.to_string()),
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        Severity::from(s.as_str())
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

/// Reference to the object the event is about
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// A reconciliation event
///
/// Events are created upstream and consumed read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub involved_object: ObjectReference,
    pub severity: Severity,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message: String,
    pub reason: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub reporting_controller: Option<String>,
    #[serde(default)]
    pub reporting_instance: Option<String>,
}

impl Event {
    /// Look up a metadata value by key
    #[must_use]
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}
