//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary shared by the identity and subscription contexts.

mod email;
mod errors;
mod ids;
mod timestamp;

pub use email::Email;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::UserId;
pub use timestamp::Timestamp;
