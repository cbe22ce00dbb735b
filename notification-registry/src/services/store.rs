//! In-memory notification registry.
//!
//! All records live in a single insertion-ordered `Vec` behind an async
//! `RwLock`. Every operation takes the lock once, so each one is atomic with
//! respect to the others and readers always see a consistent snapshot.

use crate::models::{NewNotification, Notification, NotificationStatus};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const ID_PREFIX: &str = "notif_";

#[derive(Debug, Default)]
struct Registry {
    notifications: Vec<Notification>,
    last_id_nanos: i64,
}

impl Registry {
    /// Nanosecond timestamp, bumped past the previous id on clock ties.
    fn next_id(&mut self, now_nanos: i64) -> String {
        let nanos = now_nanos.max(self.last_id_nanos.saturating_add(1));
        self.last_id_nanos = nanos;
        format!("{}{}", ID_PREFIX, nanos)
    }
}

#[derive(Clone, Default)]
pub struct NotificationStore {
    inner: Arc<RwLock<Registry>>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new record. `id`, `created_at` and `status` are always
    /// assigned here.
    pub async fn insert(&self, new: NewNotification) -> Notification {
        let mut registry = self.inner.write().await;
        let created_at = Utc::now();
        let now_nanos = created_at.timestamp_nanos_opt().unwrap_or(i64::MAX);
        let id = registry.next_id(now_nanos);
        let notification = Notification::new(id, new, created_at);
        registry.notifications.push(notification.clone());

        tracing::debug!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            total = registry.notifications.len(),
            "Notification stored"
        );

        notification
    }

    pub async fn list(&self) -> Vec<Notification> {
        self.inner.read().await.notifications.clone()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Notification> {
        self.inner
            .read()
            .await
            .notifications
            .iter()
            .find(|n| n.id == id)
            .cloned()
    }

    pub async fn find_by_user(&self, user_id: &str) -> Vec<Notification> {
        self.inner
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Returns the updated record, or `None` if the id is unknown.
    pub async fn update_status(
        &self,
        id: &str,
        status: NotificationStatus,
    ) -> Option<Notification> {
        let mut registry = self.inner.write().await;
        let notification = registry.notifications.iter_mut().find(|n| n.id == id)?;
        notification.status = status;
        Some(notification.clone())
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.notifications.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn new_for(user_id: &str, title: &str) -> NewNotification {
        NewNotification {
            user_id: user_id.to_string(),
            title: title.to_string(),
            message: "body".to_string(),
            notification_type: "push".to_string(),
        }
    }

    #[test]
    fn next_id_is_strictly_increasing_on_clock_ties() {
        let mut registry = Registry::default();
        assert_eq!(registry.next_id(1_000), "notif_1000");
        assert_eq!(registry.next_id(1_000), "notif_1001");
        assert_eq!(registry.next_id(999), "notif_1002");
        assert_eq!(registry.next_id(5_000), "notif_5000");
    }

    #[tokio::test]
    async fn insert_assigns_server_fields() {
        let store = NotificationStore::new();
        let before = Utc::now();
        let stored = store.insert(new_for("u1", "Hi")).await;
        let after = Utc::now();

        assert!(stored.id.starts_with(ID_PREFIX));
        assert_eq!(stored.status, NotificationStatus::Pending);
        assert!(stored.created_at >= before && stored.created_at <= after);
        assert_eq!(stored.user_id, "u1");
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let store = NotificationStore::new();
        assert!(store.is_empty().await);
        assert!(store.list().await.is_empty());

        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(store.insert(new_for("u1", &format!("n{}", i))).await.id);
        }

        let listed: Vec<String> = store.list().await.into_iter().map(|n| n.id).collect();
        assert_eq!(listed, ids);
        assert_eq!(store.len().await, 5);
    }

    #[tokio::test]
    async fn find_by_id_matches_exactly() {
        let store = NotificationStore::new();
        let stored = store.insert(new_for("u1", "Hi")).await;

        assert_eq!(store.find_by_id(&stored.id).await, Some(stored.clone()));
        assert_eq!(store.find_by_id("notif_0").await, None);
        assert_eq!(store.find_by_id(&stored.id[..stored.id.len() - 1]).await, None);
    }

    #[tokio::test]
    async fn find_by_user_returns_subset_in_order() {
        let store = NotificationStore::new();
        let a1 = store.insert(new_for("alice", "a1")).await;
        store.insert(new_for("bob", "b1")).await;
        let a2 = store.insert(new_for("alice", "a2")).await;

        let alice = store.find_by_user("alice").await;
        assert_eq!(alice, vec![a1, a2]);
        assert!(store.find_by_user("carol").await.is_empty());
    }

    #[tokio::test]
    async fn update_status_touches_only_target() {
        let store = NotificationStore::new();
        let first = store.insert(new_for("u1", "first")).await;
        let second = store.insert(new_for("u1", "second")).await;

        let updated = store
            .update_status(&first.id, NotificationStatus::Sent)
            .await
            .unwrap();
        assert_eq!(updated.status, NotificationStatus::Sent);

        let reloaded = store.find_by_id(&second.id).await.unwrap();
        assert_eq!(reloaded.status, NotificationStatus::Pending);

        assert!(store
            .update_status("notif_missing", NotificationStatus::Failed)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn concurrent_inserts_get_unique_ids() {
        let store = NotificationStore::new();
        let mut handles = Vec::new();
        for i in 0..64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert(new_for("u1", &format!("n{}", i))).await.id
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }

        assert_eq!(ids.len(), 64);
        assert_eq!(store.len().await, 64);
    }
}
