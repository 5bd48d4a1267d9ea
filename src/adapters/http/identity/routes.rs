//! Axum routes for identity endpoints.

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{current_user, sign_in, sign_out, sign_up, update_profile};

/// Routes reachable without a valid session.
///
/// - `POST /api/auth/sign-up`
/// - `POST /api/auth/sign-in`
/// - `POST /api/auth/sign-out` - token may be expired or unknown
/// - `PATCH /api/auth/profile` - validates the token itself
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/sign-up", post(sign_up))
        .route("/api/auth/sign-in", post(sign_in))
        .route("/api/auth/sign-out", post(sign_out))
        .route("/api/auth/profile", patch(update_profile))
}

/// Routes behind the auth middleware.
///
/// - `GET /api/auth/me`
pub fn authenticated_routes() -> Router<AppState> {
    Router::new().route("/api/auth/me", get(current_user))
}
