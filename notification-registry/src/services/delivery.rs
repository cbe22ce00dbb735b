//! Simulated notification delivery.
//!
//! Every submitted job runs on its own task tracked by a [`TaskTracker`]. A
//! job waits the configured delay and logs the send. Nothing is reported back
//! to the HTTP caller. [`DeliveryDispatcher::shutdown`] cancels in-flight
//! waits and joins every tracked task.

use crate::config::DeliveryConfig;
use crate::models::{Notification, NotificationStatus};
use crate::services::metrics::record_delivery;
use crate::services::store::NotificationStore;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

#[derive(Debug, Clone)]
pub struct DeliveryJob {
    pub notification_id: String,
    pub user_id: String,
    pub title: String,
}

impl From<&Notification> for DeliveryJob {
    fn from(notification: &Notification) -> Self {
        Self {
            notification_id: notification.id.clone(),
            user_id: notification.user_id.clone(),
            title: notification.title.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Delivery dispatcher stopped")]
    Stopped,
}

#[derive(Clone)]
pub struct DeliveryDispatcher {
    worker: Worker,
    shutdown_token: CancellationToken,
    tracker: TaskTracker,
}

impl DeliveryDispatcher {
    pub fn start(config: DeliveryConfig, store: NotificationStore) -> Self {
        let shutdown_token = CancellationToken::new();

        tracing::info!(
            delay_ms = config.delay_ms,
            mark_sent = config.mark_sent,
            "Starting delivery dispatcher"
        );

        Self {
            worker: Worker {
                delay: config.delay(),
                mark_sent: config.mark_sent,
                store,
                shutdown: shutdown_token.clone(),
            },
            shutdown_token,
            tracker: TaskTracker::new(),
        }
    }

    /// Spawn the send for `job` on the current runtime. Only refused once
    /// [`shutdown`](Self::shutdown) has begun.
    pub fn submit(&self, job: DeliveryJob) -> Result<(), DeliveryError> {
        if !self.is_running() {
            return Err(DeliveryError::Stopped);
        }

        let worker = self.worker.clone();
        self.tracker.spawn(async move {
            worker.deliver(job).await;
        });
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown_token.is_cancelled()
    }

    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    pub async fn shutdown(&self) {
        tracing::info!(in_flight = self.tracker.len(), "Initiating delivery shutdown");
        self.shutdown_token.cancel();
        self.tracker.close();
        self.tracker.wait().await;
        tracing::info!("Delivery dispatcher stopped");
    }
}

#[derive(Clone)]
struct Worker {
    delay: Duration,
    mark_sent: bool,
    store: NotificationStore,
    shutdown: CancellationToken,
}

impl Worker {
    async fn deliver(&self, job: DeliveryJob) {
        tokio::select! {
            _ = self.shutdown.cancelled() => {
                tracing::debug!(
                    notification_id = %job.notification_id,
                    "Delivery cancelled before send"
                );
                record_delivery("cancelled");
                return;
            }
            _ = tokio::time::sleep(self.delay) => {}
        }

        if self.mark_sent
            && self
                .store
                .update_status(&job.notification_id, NotificationStatus::Sent)
                .await
                .is_none()
        {
            tracing::warn!(
                notification_id = %job.notification_id,
                "Delivered notification no longer in registry"
            );
        }

        tracing::info!(
            notification_id = %job.notification_id,
            user_id = %job.user_id,
            title = %job.title,
            "Notification sent: {} to user {}",
            job.title,
            job.user_id
        );
        record_delivery("sent");
    }
}
