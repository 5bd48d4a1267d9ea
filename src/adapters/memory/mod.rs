//! In-memory stores for development and tests.
//!
//! Not durable and not shared across processes.

mod account_store;
mod session_repository;

pub use account_store::InMemoryAccountStore;
pub use session_repository::InMemorySessionRepository;
