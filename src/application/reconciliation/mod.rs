//! Reconciliation - converging on provider truth after checkout.

mod poller;

pub use poller::{LedgerStatusSource, PollOutcome, PollPolicy, ReconciliationPoller};
