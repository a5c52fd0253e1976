//! Durable state that must survive restarts.

mod ledger;

pub use ledger::{BlockLedger, LedgerSink};
