//! HTTP adapter for identity endpoints.
//!
//! - `POST /api/auth/sign-up` - Register and receive a session
//! - `POST /api/auth/sign-in` - Password sign-in
//! - `POST /api/auth/sign-out` - Revoke a session
//! - `GET /api/auth/me` - Current user and subscription snapshot
//! - `PATCH /api/auth/profile` - Update name or email

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{authenticated_routes, public_routes};
