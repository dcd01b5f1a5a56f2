//! Ledger consistency engine for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here; persistence is
//! reached only through the [`store::LedgerStore`] seam.
//!
//! # Modules
//!
//! - `chart` - Chart of accounts, hierarchy traversal, account management
//! - `ledger` - Journal entries, balanced-entry validation, the ledger engine
//! - `reports` - Balance sheet assembly
//! - `store` - Transactional store interface and an in-memory implementation

pub mod chart;
pub mod ledger;
pub mod reports;
pub mod store;

pub use chart::ChartOfAccounts;
pub use ledger::{LedgerEngine, LedgerError};
pub use store::{InMemoryLedgerStore, LedgerStore, StoreError, UnitOfWork};
