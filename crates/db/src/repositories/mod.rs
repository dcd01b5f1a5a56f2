//! PostgreSQL implementation of the ledger store.
//!
//! Reads run on the pooled connection; each unit of work wraps one
//! database transaction.

mod convert;
mod ledger;
mod unit_of_work;

pub use ledger::SeaOrmLedgerStore;
