//! Shared application state for the HTTP surface.

use std::sync::Arc;

use crate::application::handlers::identity::{
    IdentityPolicy, SignInHandler, SignOutHandler, SignUpHandler, UpdateProfileHandler,
    ValidateSessionHandler,
};
use crate::application::handlers::subscription::{
    ApplyTransitionHandler, GetSubscriptionStatusHandler, IngestWebhookHandler,
    ManualActivateHandler,
};
use crate::application::reconciliation::PollPolicy;
use crate::domain::identity::PasswordHasher;
use crate::domain::subscription::{OrderingPolicy, WebhookVerifier};
use crate::ports::{
    RateLimiter, SessionRepository, SessionValidator, SubscriptionLedger, UserRepository,
};

/// Shared application state containing all dependencies.
///
/// Cloned per request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub ledger: Arc<dyn SubscriptionLedger>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub hasher: Arc<PasswordHasher>,
    /// `None` disables webhook verification. Development only.
    pub webhook_verifier: Option<Arc<WebhookVerifier>>,
    pub identity_policy: IdentityPolicy,
    pub ordering_policy: OrderingPolicy,
    pub poll_policy: PollPolicy,
    pub default_period_days: i64,
}

impl AppState {
    /// Create handlers on demand from the shared state.
    pub fn sign_up_handler(&self) -> SignUpHandler {
        SignUpHandler::new(
            self.users.clone(),
            self.sessions.clone(),
            self.hasher.clone(),
            self.identity_policy,
        )
    }

    pub fn sign_in_handler(&self) -> SignInHandler {
        SignInHandler::new(
            self.users.clone(),
            self.sessions.clone(),
            self.hasher.clone(),
            self.identity_policy,
        )
    }

    pub fn sign_out_handler(&self) -> SignOutHandler {
        SignOutHandler::new(self.sessions.clone())
    }

    pub fn validate_session_handler(&self) -> ValidateSessionHandler {
        ValidateSessionHandler::new(self.sessions.clone(), self.users.clone())
    }

    pub fn update_profile_handler(&self) -> UpdateProfileHandler {
        UpdateProfileHandler::new(
            Arc::new(self.validate_session_handler()),
            self.users.clone(),
        )
    }

    /// Session validator for the auth middleware.
    pub fn session_validator(&self) -> Arc<dyn SessionValidator> {
        Arc::new(self.validate_session_handler())
    }

    pub fn get_status_handler(&self) -> GetSubscriptionStatusHandler {
        GetSubscriptionStatusHandler::new(self.ledger.clone())
    }

    fn apply_transition_handler(&self) -> Arc<ApplyTransitionHandler> {
        Arc::new(ApplyTransitionHandler::new(
            self.ledger.clone(),
            self.ordering_policy,
        ))
    }

    pub fn ingest_webhook_handler(&self) -> IngestWebhookHandler {
        IngestWebhookHandler::new(
            self.webhook_verifier.clone(),
            self.apply_transition_handler(),
            self.default_period_days,
        )
    }

    pub fn manual_activate_handler(&self) -> ManualActivateHandler {
        ManualActivateHandler::new(
            self.apply_transition_handler(),
            self.rate_limiter.clone(),
            self.default_period_days,
        )
    }
}
