//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Journal entry and detail types
//! - Debit/credit totals and normal-side balances
//! - Balanced-entry validation
//! - Error types shared by all ledger operations
//! - The ledger engine (atomic entry creation, listing, balance sheet)

pub mod balance;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use balance::LineTotals;
pub use error::LedgerError;
pub use service::LedgerEngine;
pub use types::{
    JournalDetail, JournalDetailView, JournalEntry, JournalEntryWithDetails, JournalFilter,
    JournalStatus, NewJournalDetail, NewJournalEntry, UnknownJournalStatus,
};
pub use validation::{
    AMOUNT_LIMIT, AMOUNT_SCALE, BALANCE_TOLERANCE, MAX_REFERENCE_LEN, validate_entry,
};
