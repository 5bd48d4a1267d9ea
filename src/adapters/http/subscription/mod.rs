//! HTTP adapter for subscription endpoints.
//!
//! - `GET /api/subscription/status` - Gating snapshot
//! - `POST /api/subscription/reconcile` - Bounded poll after checkout
//! - `POST /api/subscription/activate` - Manual activation fallback
//! - `POST /api/webhooks/polar` - Payment provider webhooks

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::SIGNATURE_HEADERS;
pub use routes::{subscription_routes, webhook_routes};
