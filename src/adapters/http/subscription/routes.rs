//! Axum routes for subscription and webhook endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{get_status, manual_activate, receive_webhook, reconcile};

/// Routes behind the auth middleware.
///
/// - `GET /api/subscription/status`
/// - `POST /api/subscription/reconcile`
/// - `POST /api/subscription/activate`
pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route("/api/subscription/status", get(get_status))
        .route("/api/subscription/reconcile", post(reconcile))
        .route("/api/subscription/activate", post(manual_activate))
}

/// Webhook routes. No session; verified by signature.
///
/// - `POST /api/webhooks/polar`
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/api/webhooks/polar", post(receive_webhook))
}
