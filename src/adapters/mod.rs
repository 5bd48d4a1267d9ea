//! Adapters - Implementations of ports for external systems.
//!
//! - `memory` - In-memory stores for development and tests
//! - `postgres` - PostgreSQL stores
//! - `rate_limiter` - Fixed-window rate limiting
//! - `http` - axum REST surface

pub mod http;
pub mod memory;
pub mod postgres;
pub mod rate_limiter;
