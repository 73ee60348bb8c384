//! SQLite-backed alert ledger: pending signals, expiry sweeps, and
//! movement-check bookkeeping.

pub mod store;

pub use store::{LedgerRecord, SignalLedger};
