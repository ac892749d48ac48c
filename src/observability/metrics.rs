//! # Metrics
//!
//! Prometheus metrics for monitoring the notifier.
//!
//! ## Metrics Exposed
//!
//! - `commit_status_notifications_total` - Notifications by provider and result (`sent`, `skipped`, `failed`)
//! - `commit_status_notification_duration_seconds` - Duration of notifications by provider
//! - `commit_status_redactions_total` - Error messages that had a token masked
//! - `commit_status_redaction_failures_total` - Error messages replaced by the redaction placeholder

use anyhow::Result;
use prometheus::{HistogramVec, IntCounter, IntCounterVec, Registry};
use std::sync::LazyLock;

// Metrics
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static NOTIFICATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "commit_status_notifications_total",
            "Total number of commit status notifications by provider and result",
        ),
        &["provider", "result"],
    )
    .expect("Failed to create NOTIFICATIONS_TOTAL metric - this should never happen")
});

static NOTIFICATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "commit_status_notification_duration_seconds",
            "Duration of commit status notifications in seconds by provider",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 15.0]),
        &["provider"],
    )
    .expect("Failed to create NOTIFICATION_DURATION metric - this should never happen")
});

static REDACTIONS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "commit_status_redactions_total",
        "Total number of error messages with a token redacted",
    )
    .expect("Failed to create REDACTIONS_TOTAL metric - this should never happen")
});

static REDACTION_FAILURES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "commit_status_redaction_failures_total",
        "Total number of error messages replaced because the token could not be redacted",
    )
    .expect("Failed to create REDACTION_FAILURES_TOTAL metric - this should never happen")
});

/// Register all metrics with the crate registry
///
/// Safe to call more than once; metrics that are already registered are skipped.
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn register_metrics() -> Result<()> {
    register(Box::new(NOTIFICATIONS_TOTAL.clone()))?;
    register(Box::new(NOTIFICATION_DURATION.clone()))?;
    register(Box::new(REDACTIONS_TOTAL.clone()))?;
    register(Box::new(REDACTION_FAILURES_TOTAL.clone()))?;

    Ok(())
}

fn register(collector: Box<dyn prometheus::core::Collector>) -> Result<()> {
    match REGISTRY.register(collector) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Gather all registered metric families
pub fn gather() -> Vec<prometheus::proto::MetricFamily> {
    REGISTRY.gather()
}

/// Record the outcome of one notification
pub fn record_notification(provider: &str, result: &str, duration: f64) {
    NOTIFICATIONS_TOTAL
        .with_label_values(&[provider, result])
        .inc();
    NOTIFICATION_DURATION
        .with_label_values(&[provider])
        .observe(duration);
}

pub fn increment_redactions() {
    REDACTIONS_TOTAL.inc();
}

pub fn increment_redaction_failures() {
    REDACTION_FAILURES_TOTAL.inc();
}
