//! Scriptorium - session and subscription reconciliation service.
//!
//! Issues bearer sessions for the editor, keeps a local ledger of each
//! user's subscription in sync with the payment provider's webhooks, and
//! gives the client a bounded way to wait for that sync after checkout.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
