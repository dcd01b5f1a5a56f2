//! Ledger engine.
//!
//! Creates journal entries atomically, lists them with their detail lines
//! and produces the balance sheet. Validation happens before any write; a
//! failure after the unit of work is opened rolls back every write.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use tally_shared::types::JournalEntryId;

use super::error::LedgerError;
use super::types::{JournalDetailView, JournalEntryWithDetails, JournalFilter, NewJournalEntry};
use super::validation::validate_entry;
use crate::reports::{BalanceSheetReport, ReportService};
use crate::store::{LedgerStore, StoreError, UnitOfWork};

/// Rolls back `uow` and hands back the error that caused it.
///
/// If the rollback fails as well, both failures are reported together.
pub(crate) async fn abandon(uow: Box<dyn UnitOfWork>, err: LedgerError) -> LedgerError {
    match uow.rollback().await {
        Ok(()) => err,
        Err(rollback) => LedgerError::RollbackFailed {
            cause: Box::new(err),
            rollback,
        },
    }
}

/// Journal entry creation, listing and reporting over a [`LedgerStore`].
#[derive(Clone)]
pub struct LedgerEngine {
    store: Arc<dyn LedgerStore>,
}

impl LedgerEngine {
    /// Creates an engine over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Creates a balanced journal entry with all of its detail lines.
    ///
    /// Either the header and every line are persisted, or nothing is.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::EmptyEntry`] / [`LedgerError::NegativeAmount`] for malformed lines
    /// - [`LedgerError::UnbalancedEntry`] if debits and credits differ by more than 0.01
    /// - [`LedgerError::AccountNotFound`] if a line references an unknown account
    /// - [`LedgerError::Store`] if persistence fails
    pub async fn create_journal_entry(
        &self,
        input: NewJournalEntry,
    ) -> Result<JournalEntryId, LedgerError> {
        validate_entry(&input)?;

        let mut uow = self.store.begin().await?;
        match Self::write_entry(uow.as_mut(), &input).await {
            Ok(id) => {
                uow.commit().await?;
                Ok(id)
            }
            Err(err) => Err(abandon(uow, err).await),
        }
    }

    async fn write_entry(
        uow: &mut dyn UnitOfWork,
        input: &NewJournalEntry,
    ) -> Result<JournalEntryId, LedgerError> {
        let referenced: BTreeSet<_> = input.details.iter().map(|d| d.account_id).collect();
        for account_id in referenced {
            if uow.find_account(account_id).await?.is_none() {
                return Err(LedgerError::AccountNotFound(account_id));
            }
        }

        let journal_id = uow.insert_journal_header(input).await?;
        for detail in &input.details {
            uow.insert_journal_detail(journal_id, detail)
                .await
                .map_err(|e| match e {
                    StoreError::ForeignKeyViolation(_) => {
                        LedgerError::AccountNotFound(detail.account_id)
                    }
                    other => LedgerError::Store(other),
                })?;
        }
        Ok(journal_id)
    }

    /// Lists entries matching `filter`, newest first, each with its detail lines.
    ///
    /// Detail lines for all returned entries are fetched in a single call.
    pub async fn list_journal_entries(
        &self,
        filter: &JournalFilter,
    ) -> Result<Vec<JournalEntryWithDetails>, LedgerError> {
        let entries = self.store.list_journal_entries(filter).await?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<JournalEntryId> = entries.iter().map(|e| e.id).collect();
        let mut by_entry: HashMap<JournalEntryId, Vec<JournalDetailView>> = HashMap::new();
        for line in self.store.list_journal_details(&ids).await? {
            by_entry.entry(line.detail.journal_id).or_default().push(line);
        }

        Ok(entries
            .into_iter()
            .map(|entry| JournalEntryWithDetails {
                details: by_entry.remove(&entry.id).unwrap_or_default(),
                entry,
            })
            .collect())
    }

    /// Builds the balance sheet from posted entries dated on or before `as_of`.
    pub async fn generate_balance_sheet(
        &self,
        as_of: NaiveDate,
    ) -> Result<BalanceSheetReport, LedgerError> {
        let hierarchy = self.store.account_hierarchy().await?;
        let totals = self.store.posted_totals(as_of).await?;
        Ok(ReportService::generate_balance_sheet(as_of, &hierarchy, &totals))
    }
}
