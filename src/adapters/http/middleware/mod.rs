//! HTTP middleware for axum.
//!
//! - `auth` - Session validation middleware and extractors

pub mod auth;

pub use auth::{auth_middleware, AuthRejection, AuthState, BearerToken, RequireAuth};
