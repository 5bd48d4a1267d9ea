//! Ports - async traits for every external dependency.
//!
//! Adapters implement these; application handlers depend only on them.
//!
//! - `UserRepository` - credential store
//! - `SessionRepository` - bearer session store
//! - `SubscriptionLedger` - per-user subscription state
//! - `SessionValidator` - token to caller resolution
//! - `RateLimiter` - fixed-window throttling
//! - `SubscriptionStatusSource` - what the reconciliation poller reads

mod rate_limiter;
mod session_repository;
mod session_validator;
mod subscription_ledger;
mod subscription_status_source;
mod user_repository;

pub use rate_limiter::{RateLimitDecision, RateLimitKey, RateLimiter};
pub use session_repository::SessionRepository;
pub use session_validator::SessionValidator;
pub use subscription_ledger::SubscriptionLedger;
pub use subscription_status_source::SubscriptionStatusSource;
pub use user_repository::UserRepository;
