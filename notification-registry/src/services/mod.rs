pub mod delivery;
pub mod metrics;
pub mod store;

pub use delivery::{DeliveryDispatcher, DeliveryError, DeliveryJob};
pub use metrics::{get_metrics, init_metrics, record_delivery, record_notification_created};
pub use store::NotificationStore;
