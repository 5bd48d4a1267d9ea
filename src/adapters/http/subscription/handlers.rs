//! HTTP handlers for subscription and webhook endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use tokio::sync::watch;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::subscription::{
    GetSubscriptionStatusQuery, IngestWebhookCommand, ManualActivateCommand,
};
use crate::application::reconciliation::{LedgerStatusSource, ReconciliationPoller};
use crate::domain::subscription::SubscriptionError;

use super::dto::{ManualActivateRequest, ReconcileResponse, WebhookAck};

/// Signature headers, in lookup order.
pub const SIGNATURE_HEADERS: [&str; 2] = ["webhook-signature", "polar-signature"];

/// GET /api/subscription/status - Current gating snapshot
pub async fn get_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state
        .get_status_handler()
        .handle(GetSubscriptionStatusQuery { user_id: user.id })
        .await?;

    Ok(Json(snapshot))
}

/// POST /api/subscription/reconcile - Bounded server-side poll
///
/// Used after a checkout redirect. Dropping the connection drops the poll.
pub async fn reconcile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let source = Arc::new(LedgerStatusSource::new(
        Arc::new(state.get_status_handler()),
        user.id,
    ));
    let poller = ReconciliationPoller::new(source, state.poll_policy);

    let (_cancel, cancel_rx) = watch::channel(false);
    let outcome = poller.run(cancel_rx).await;

    let response =
        ReconcileResponse::from_outcome(outcome).ok_or(SubscriptionError::Unauthorized)?;
    Ok(Json(response))
}

/// POST /api/subscription/activate - Manual activation fallback
pub async fn manual_activate(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    request: Option<Json<ManualActivateRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let snapshot = state
        .manual_activate_handler()
        .handle(ManualActivateCommand {
            caller: user,
            email: request.email,
        })
        .await?;

    Ok(Json(snapshot))
}

/// POST /api/webhooks/polar - Payment provider callback
///
/// The raw body is passed through untouched for signature verification.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = SIGNATURE_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let outcome = state
        .ingest_webhook_handler()
        .handle(IngestWebhookCommand {
            payload: body.to_vec(),
            signature,
        })
        .await?;

    tracing::debug!(?outcome, "Webhook processed");
    Ok(Json(WebhookAck { received: true }))
}
