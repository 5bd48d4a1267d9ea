//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers write, query handlers read, and the reconciliation
//! poller drives reads over time.

pub mod handlers;
pub mod reconciliation;
