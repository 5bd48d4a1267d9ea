//! API error type that converts context errors to HTTP responses.
//!
//! Every error body has the shape `{ "code": "...", "message": "..." }`.
//! Internal failures are logged here and returned with a generic message.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::identity::AuthError;
use crate::domain::subscription::{SubscriptionError, WebhookError};

const INTERNAL_MESSAGE: &str = "Something went wrong, please try again";

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Errors a handler can return.
#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    Subscription(SubscriptionError),
    Webhook(WebhookError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl From<SubscriptionError> for ApiError {
    fn from(err: SubscriptionError) -> Self {
        Self::Subscription(err)
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        Self::Webhook(err)
    }
}

impl ApiError {
    /// HTTP status and machine-readable code.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Auth(err) => match err {
                AuthError::InvalidCredential => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIAL"),
                AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
                AuthError::Conflict => (StatusCode::CONFLICT, "EMAIL_TAKEN"),
                AuthError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
                AuthError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
            ApiError::Subscription(err) => match err {
                SubscriptionError::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
                SubscriptionError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
                SubscriptionError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                SubscriptionError::RateLimited { .. } => {
                    (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED")
                }
                SubscriptionError::Internal(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                }
            },
            ApiError::Webhook(err) => (err.status_code(), err.code()),
        }
    }

    fn is_internal(&self) -> bool {
        matches!(
            self,
            ApiError::Auth(AuthError::Internal(_))
                | ApiError::Subscription(SubscriptionError::Internal(_))
                | ApiError::Webhook(WebhookError::Internal(_))
        )
    }

    fn message(&self) -> String {
        match self {
            ApiError::Auth(err) => err.to_string(),
            ApiError::Subscription(err) => err.to_string(),
            ApiError::Webhook(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if self.is_internal() {
            tracing::error!(error = %self.message(), "Request failed");
            INTERNAL_MESSAGE.to_string()
        } else {
            self.message()
        };

        let mut response = (status, Json(ErrorResponse::new(code, message))).into_response();

        if let ApiError::Subscription(SubscriptionError::RateLimited { retry_after_secs }) = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credential_is_401() {
        let (status, code) = ApiError::from(AuthError::InvalidCredential).status_and_code();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(code, "INVALID_CREDENTIAL");
    }

    #[test]
    fn conflict_is_409() {
        let (status, _) = ApiError::from(AuthError::Conflict).status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn manual_activation_errors_map_to_distinct_statuses() {
        let cases = [
            (SubscriptionError::UserNotFound, StatusCode::NOT_FOUND),
            (SubscriptionError::Forbidden, StatusCode::FORBIDDEN),
            (
                SubscriptionError::RateLimited {
                    retry_after_secs: 10,
                },
                StatusCode::TOO_MANY_REQUESTS,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_and_code().0, expected);
        }
    }

    #[test]
    fn rate_limited_sets_retry_after() {
        let response = ApiError::from(SubscriptionError::RateLimited {
            retry_after_secs: 42,
        })
        .into_response();

        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "42"
        );
    }

    #[test]
    fn webhook_errors_use_their_own_status() {
        let (status, _) = ApiError::from(WebhookError::InvalidSignature).status_and_code();
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) =
            ApiError::from(WebhookError::MalformedEvent("no type".into())).status_and_code();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_errors_hide_details() {
        let response =
            ApiError::from(AuthError::internal("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
