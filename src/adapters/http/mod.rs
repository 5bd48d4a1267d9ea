//! HTTP adapters - REST API for identity, subscription and webhooks.

pub mod error;
pub mod identity;
pub mod middleware;
pub mod router;
pub mod state;
pub mod subscription;

pub use error::{ApiError, ErrorResponse};
pub use router::{api_router, with_http_layers};
pub use state::AppState;
