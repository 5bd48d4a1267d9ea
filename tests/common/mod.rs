//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use hmac::{Hmac, Mac};
use secrecy::SecretString;
use serde_json::Value;
use sha2::Sha256;
use tower::ServiceExt;

use scriptorium::adapters::http::{api_router, AppState};
use scriptorium::adapters::memory::{InMemoryAccountStore, InMemorySessionRepository};
use scriptorium::adapters::rate_limiter::InMemoryRateLimiter;
use scriptorium::application::handlers::identity::IdentityPolicy;
use scriptorium::application::reconciliation::PollPolicy;
use scriptorium::domain::identity::PasswordHasher;
use scriptorium::domain::subscription::{OrderingPolicy, WebhookVerifier};

pub const WEBHOOK_SECRET: &str = "whsec_integration";
pub const PASSWORD: &str = "correct horse battery";

pub struct TestApp {
    pub router: Router,
    pub accounts: Arc<InMemoryAccountStore>,
}

pub fn app() -> TestApp {
    app_with(true, 3)
}

pub fn app_with(verify_webhooks: bool, manual_activation_limit: u32) -> TestApp {
    let accounts = Arc::new(InMemoryAccountStore::new());
    let hasher = PasswordHasher::with_cost(8, 1, 1, None).expect("argon2 params");
    let rate_limiter = InMemoryRateLimiter::new(manual_activation_limit, 3600);

    let state = AppState {
        users: accounts.clone(),
        sessions: Arc::new(InMemorySessionRepository::new()),
        ledger: accounts.clone(),
        rate_limiter: Arc::new(rate_limiter),
        hasher: Arc::new(hasher),
        webhook_verifier: verify_webhooks.then(|| {
            Arc::new(WebhookVerifier::new(
                SecretString::new(WEBHOOK_SECRET.to_string()),
                300,
            ))
        }),
        identity_policy: IdentityPolicy::default(),
        ordering_policy: OrderingPolicy::RejectStale,
        poll_policy: PollPolicy {
            interval: Duration::from_millis(10),
            max_attempts: 3,
        },
        default_period_days: 30,
    };

    TestApp {
        router: api_router(state),
        accounts,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send(request).await
    }

    /// Registers an account and returns its session token.
    pub async fn sign_up(&self, email: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/auth/sign-up",
                None,
                Some(serde_json::json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "sign-up failed: {body}");
        body["token"].as_str().expect("token").to_string()
    }

    pub async fn webhook(&self, payload: &Value, signed_at: i64) -> (StatusCode, Value) {
        let raw = payload.to_string();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/webhooks/polar")
            .header(header::CONTENT_TYPE, "application/json")
            .header("webhook-signature", signature_header(&raw, signed_at))
            .body(Body::from(raw))
            .expect("request");
        self.send(request).await
    }
}

pub fn signature_header(raw: &str, signed_at: i64) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).expect("HMAC accepts any key");
    mac.update(format!("{signed_at}.{raw}").as_bytes());
    format!("t={signed_at},v1={}", hex::encode(mac.finalize().into_bytes()))
}

pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
