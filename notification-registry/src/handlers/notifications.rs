use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::models::{NewNotification, Notification};
use crate::services::{record_notification_created, DeliveryJob};
use crate::startup::AppState;

pub const NOT_FOUND_MESSAGE: &str = "Notification not found";

#[tracing::instrument(skip(state))]
pub async fn list_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.store.list().await)
}

/// The body is parsed by hand so that every malformed payload, whatever the
/// content type, maps to a 400 carrying the parser message.
#[tracing::instrument(skip(state, body))]
pub async fn create_notification(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Notification>), AppError> {
    let new = NewNotification::from_json(&body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected notification body");
        AppError::BadRequest(anyhow::Error::new(e))
    })?;

    let notification = state.store.insert(new).await;
    record_notification_created(&notification.notification_type);

    if let Err(e) = state.delivery.submit(DeliveryJob::from(&notification)) {
        tracing::warn!(
            notification_id = %notification.id,
            error = %e,
            "Delivery not scheduled"
        );
    }

    tracing::info!(
        notification_id = %notification.id,
        user_id = %notification.user_id,
        notification_type = %notification.notification_type,
        "Notification created"
    );

    Ok((StatusCode::CREATED, Json(notification)))
}

#[tracing::instrument(skip(state))]
pub async fn get_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Notification>, AppError> {
    state
        .store
        .find_by_id(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!(NOT_FOUND_MESSAGE)))
}

#[tracing::instrument(skip(state))]
pub async fn list_user_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<Notification>> {
    Json(state.store.find_by_user(&user_id).await)
}
