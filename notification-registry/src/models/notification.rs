use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Unexpected};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationStatus::Pending => write!(f, "pending"),
            NotificationStatus::Sent => write!(f, "sent"),
            NotificationStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A stored notification.
///
/// `notification_type` is a free-form channel label ("email", "sms", "push")
/// and is never validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied part of a notification.
///
/// Server-owned fields (`id`, `status`, `created_at`) are not part of this
/// shape, so any values a client sends for them are dropped on parse.
/// Absent or `null` fields become empty strings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct NewNotification {
    #[serde(default, deserialize_with = "nullable_string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub message: String,
    #[serde(rename = "type", default, deserialize_with = "nullable_string")]
    pub notification_type: String,
}

impl NewNotification {
    /// Parse a request body. A JSON object is accepted, and a literal `null`
    /// yields an all-empty notification.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        if !value.is_object() {
            return Err(de::Error::invalid_type(
                unexpected(&value),
                &"a notification object",
            ));
        }
        serde_json::from_value(value)
    }
}

fn unexpected(value: &serde_json::Value) -> Unexpected<'_> {
    match value {
        serde_json::Value::Null => Unexpected::Unit,
        serde_json::Value::Bool(b) => Unexpected::Bool(*b),
        serde_json::Value::Number(_) => Unexpected::Other("number"),
        serde_json::Value::String(s) => Unexpected::Str(s),
        serde_json::Value::Array(_) => Unexpected::Seq,
        serde_json::Value::Object(_) => Unexpected::Map,
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Notification {
    pub fn new(id: String, new: NewNotification, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            title: new.title,
            message: new.message,
            notification_type: new.notification_type,
            status: NotificationStatus::Pending,
            created_at,
        }
    }
}
