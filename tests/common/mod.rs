//! Common test utilities
//!
//! Provides rustls initialization, event builders and a recording
//! `CommitStatusClient` used in place of the provider REST APIs.

#![allow(dead_code, reason = "Each test binary uses a different subset")]

use async_trait::async_trait;
use commit_status_notifier::error::TransportError;
use commit_status_notifier::event::{Event, ObjectReference, Severity};
use commit_status_notifier::notifier::{CommitStatusClient, CommitStatusRequest};
use std::collections::BTreeMap;
use std::sync::{Mutex, Once};

static RUSTLS_INIT: Once = Once::new();

/// Initialize rustls crypto provider for tests
///
/// Uses a `Once` to ensure it's only called once across all tests.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        // We use ring as the crypto provider (matches main application)
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Event for `Kustomization/webapp` in namespace `apps`
pub fn event(reason: &str, severity: Severity, revision: Option<&str>) -> Event {
    let mut metadata = BTreeMap::new();
    if let Some(revision) = revision {
        metadata.insert("revision".to_string(), revision.to_string());
    }

    Event {
        involved_object: ObjectReference {
            kind: "Kustomization".to_string(),
            name: "webapp".to_string(),
            namespace: Some("apps".to_string()),
        },
        severity,
        timestamp: None,
        message: "Applied revision main/4f1c2d9".to_string(),
        reason: reason.to_string(),
        metadata,
        reporting_controller: Some("kustomize-controller".to_string()),
        reporting_instance: None,
    }
}

/// Commit status client that records requests instead of sending them
#[derive(Debug, Default)]
pub struct RecordingClient {
    requests: Mutex<Vec<CommitStatusRequest>>,
    failure: Option<(u16, String)>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client whose every call fails with `status` and response `body`
    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            failure: Some((status, body.to_string())),
        }
    }

    pub fn requests(&self) -> Vec<CommitStatusRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CommitStatusClient for RecordingClient {
    async fn create_commit_status(
        &self,
        request: &CommitStatusRequest,
    ) -> Result<(), TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.failure {
            Some((status, body)) => Err(TransportError::Status {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }
}
