//! Application startup and lifecycle management.
//!
//! Builds the HTTP router over the shared registry and owns the delivery
//! dispatcher so it can be drained when the server stops.

use crate::config::NotificationConfig;
use crate::handlers::{
    create_notification, get_notification, health_check, list_notifications,
    list_user_notifications, metrics_endpoint, readiness_check,
};
use crate::services::{DeliveryDispatcher, NotificationStore};
use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: NotificationStore,
    pub delivery: DeliveryDispatcher,
}

impl AppState {
    /// Fresh, empty registry with a running dispatcher.
    pub fn new(config: &NotificationConfig) -> Self {
        let store = NotificationStore::new();
        let delivery = DeliveryDispatcher::start(config.delivery.clone(), store.clone());
        Self { store, delivery }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/notifications",
            get(list_notifications).post(create_notification),
        )
        .route("/notifications/:id", get(get_notification))
        .route("/users/:user_id/notifications", get(list_user_notifications))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Bind the listener and start the dispatcher. Port 0 picks a random port.
    pub async fn build(config: NotificationConfig) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let state = AppState::new(&config);

        tracing::info!("Notification service starting on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a handle to the registry.
    pub fn store(&self) -> &NotificationStore {
        &self.state.store
    }

    /// Run the application until the process is killed.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests and stop
    /// the delivery dispatcher.
    pub async fn run_with_shutdown<F>(self, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delivery = self.state.delivery.clone();
        let router = build_router(self.state);

        let result = axum::serve(self.listener, router)
            .with_graceful_shutdown(signal)
            .await;

        delivery.shutdown().await;

        if let Err(e) = &result {
            tracing::error!("HTTP server error: {}", e);
        }
        result
    }
}
