//! Assembles the full HTTP application.

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::identity;
use super::middleware::auth_middleware;
use super::state::AppState;
use super::subscription;

/// Builds the route table.
///
/// Session-bound routes sit behind `auth_middleware`; sign-up, sign-in,
/// sign-out, profile, webhooks and health do not.
pub fn api_router(state: AppState) -> Router {
    let authenticated = Router::new()
        .merge(identity::authenticated_routes())
        .merge(subscription::subscription_routes())
        .route_layer(middleware::from_fn_with_state(
            state.session_validator(),
            auth_middleware,
        ));

    Router::new()
        .merge(identity::public_routes())
        .merge(subscription::webhook_routes())
        .merge(authenticated)
        .route("/health", get(health))
        .with_state(state)
}

/// Wraps a router with request ids, tracing, a timeout and CORS.
pub fn with_http_layers(router: Router, request_timeout: Duration, cors_origins: &[String]) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(request_timeout))
            .layer(cors_layer(cors_origins)),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// GET /health - Liveness
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
