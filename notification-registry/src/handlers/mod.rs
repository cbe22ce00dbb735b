//! HTTP handlers for notification-registry.

pub mod health;
pub mod notifications;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use notifications::{
    create_notification, get_notification, list_notifications, list_user_notifications,
};
