//! HTTP handlers for identity endpoints.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::{BearerToken, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::identity::{
    SignInCommand, SignOutCommand, SignUpCommand, UpdateProfileCommand,
};
use crate::application::handlers::subscription::GetSubscriptionStatusQuery;

use super::dto::{
    CurrentUserResponse, ProfileResponse, SessionResponse, SignInRequest, SignUpRequest,
    UpdateProfileRequest,
};

/// POST /api/auth/sign-up - Register and sign in
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .sign_up_handler()
        .handle(SignUpCommand {
            email: request.email,
            password: request.password,
            name: request.name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::from(&result.session)),
    ))
}

/// POST /api/auth/sign-in - Exchange credentials for a session
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .sign_in_handler()
        .handle(SignInCommand {
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok(Json(SessionResponse::from(&result.session)))
}

/// POST /api/auth/sign-out - Revoke the presented session
///
/// Succeeds for unknown and expired tokens, and without a token at all.
pub async fn sign_out(
    State(state): State<AppState>,
    token: Option<BearerToken>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(BearerToken(token)) = token {
        state
            .sign_out_handler()
            .handle(SignOutCommand { token })
            .await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me - Session owner and subscription snapshot
pub async fn current_user(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let subscription = state
        .get_status_handler()
        .handle(GetSubscriptionStatusQuery { user_id: user.id })
        .await?;

    Ok(Json(CurrentUserResponse {
        profile: ProfileResponse::from(user),
        subscription,
    }))
}

/// PATCH /api/auth/profile - Change name and/or email
pub async fn update_profile(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .update_profile_handler()
        .handle(UpdateProfileCommand {
            token,
            name: request.name,
            email: request.email,
        })
        .await?;

    Ok(Json(ProfileResponse::from(&user)))
}
