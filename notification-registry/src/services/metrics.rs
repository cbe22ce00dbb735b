//! Metrics collection for notification-registry.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use service_core::error::AppError;
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Call once, from `main`.
pub fn init_metrics() -> Result<(), AppError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Prometheus recorder: {}", e)))?;

    METRICS_HANDLE.set(handle).map_err(|_| {
        AppError::InternalError(anyhow::anyhow!("metrics handle already initialized"))
    })
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count a created notification. Unknown channel labels are folded into
/// `other` to keep label cardinality bounded.
pub fn record_notification_created(notification_type: &str) {
    let channel = channel_label(notification_type);
    metrics::counter!("notifications_created_total", "type" => channel).increment(1);
}

pub fn record_delivery(outcome: &'static str) {
    metrics::counter!("notifications_delivered_total", "outcome" => outcome).increment(1);
}

fn channel_label(notification_type: &str) -> &'static str {
    match notification_type {
        "email" => "email",
        "sms" => "sms",
        "push" => "push",
        _ => "other",
    }
}
