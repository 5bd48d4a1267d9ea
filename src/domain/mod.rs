//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `identity` - Users, sessions and password verifiers
//! - `subscription` - Subscription ledger, webhook verification and event mapping

pub mod foundation;
pub mod identity;
pub mod subscription;
