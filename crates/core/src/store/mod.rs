//! Transactional store interface.
//!
//! The engine never talks to a database directly. Reads go through
//! [`LedgerStore`]; writes go through a [`UnitOfWork`] obtained from
//! [`LedgerStore::begin`], which makes them visible only on
//! [`UnitOfWork::commit`]. Dropping a unit of work without committing
//! discards its writes.

mod error;
mod memory;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tally_shared::types::{AccountId, JournalDetailId, JournalEntryId};

use crate::chart::{Account, AccountSummary, HierarchyNode, NewAccount, flatten_hierarchy};
use crate::ledger::{
    JournalDetailView, JournalEntry, JournalFilter, LineTotals, NewJournalDetail,
    NewJournalEntry,
};

pub use error::StoreError;
pub use memory::InMemoryLedgerStore;

/// Read access plus the entry point for transactional writes.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Opens a unit of work.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;

    /// Lists every account ordered by code, with parent name and child count.
    async fn list_accounts(&self) -> Result<Vec<AccountSummary>, StoreError>;

    /// Fetches a single account with parent name and child count.
    async fn find_account(&self, id: AccountId) -> Result<Option<AccountSummary>, StoreError>;

    /// Lists entry headers matching `filter`, newest date first, ties by id descending.
    async fn list_journal_entries(
        &self,
        filter: &JournalFilter,
    ) -> Result<Vec<JournalEntry>, StoreError>;

    /// Fetches the detail lines of all given entries in one round trip.
    async fn list_journal_details(
        &self,
        journal_ids: &[JournalEntryId],
    ) -> Result<Vec<JournalDetailView>, StoreError>;

    /// Returns the chart in hierarchy order.
    async fn account_hierarchy(&self) -> Result<Vec<HierarchyNode>, StoreError> {
        let accounts: Vec<Account> = self
            .list_accounts()
            .await?
            .into_iter()
            .map(|summary| summary.account)
            .collect();
        Ok(flatten_hierarchy(&accounts))
    }

    /// Sums debits and credits per account over posted entries dated on or before `as_of`.
    ///
    /// Accounts without qualifying lines are absent from the map.
    async fn posted_totals(
        &self,
        as_of: NaiveDate,
    ) -> Result<HashMap<AccountId, LineTotals>, StoreError>;
}

/// A set of writes that become visible together or not at all.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Fetches an account as seen inside this unit of work.
    async fn find_account(&mut self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Fetches an account by its unique code.
    async fn find_account_by_code(&mut self, code: &str) -> Result<Option<Account>, StoreError>;

    /// Inserts an account and returns its generated ID.
    ///
    /// Fails with [`StoreError::UniqueViolation`] if the code is taken.
    async fn insert_account(&mut self, input: &NewAccount) -> Result<AccountId, StoreError>;

    /// Overwrites the mutable fields of an existing account.
    async fn update_account(&mut self, account: &Account) -> Result<(), StoreError>;

    /// Inserts an entry header (its detail lines are written separately).
    async fn insert_journal_header(
        &mut self,
        input: &NewJournalEntry,
    ) -> Result<JournalEntryId, StoreError>;

    /// Inserts one detail line under `journal_id`.
    async fn insert_journal_detail(
        &mut self,
        journal_id: JournalEntryId,
        detail: &NewJournalDetail,
    ) -> Result<JournalDetailId, StoreError>;

    /// Makes every write visible.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// Discards every write.
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}
