//! In-memory ledger store.
//!
//! Backs tests and local runs without PostgreSQL. A unit of work holds the
//! store lock for its whole lifetime and edits a private copy of the state,
//! so concurrent writers are serialised and readers never observe a partial
//! entry. The copy replaces the shared state on commit.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tally_shared::types::{AccountId, JournalDetailId, JournalEntryId};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{LedgerStore, StoreError, UnitOfWork};
use crate::chart::{Account, AccountSummary, NewAccount};
use crate::ledger::{
    JournalDetail, JournalDetailView, JournalEntry, JournalFilter, JournalStatus, LineTotals,
    NewJournalDetail, NewJournalEntry,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    accounts: BTreeMap<AccountId, Account>,
    entries: BTreeMap<JournalEntryId, JournalEntry>,
    details: Vec<JournalDetail>,
}

impl MemoryState {
    fn summarize(&self, account: &Account) -> AccountSummary {
        let parent_name = account
            .parent_id
            .and_then(|p| self.accounts.get(&p))
            .map(|p| p.account_name.clone());
        let children = self
            .accounts
            .values()
            .filter(|a| a.parent_id == Some(account.id))
            .count();
        let child_count = u64::try_from(children).unwrap_or(u64::MAX);
        AccountSummary {
            account: account.clone(),
            parent_name,
            child_count,
        }
    }

    fn code_taken(&self, code: &str, except: Option<AccountId>) -> bool {
        self.accounts
            .values()
            .any(|a| a.account_code == code && Some(a.id) != except)
    }

    fn check_parent(&self, parent_id: Option<AccountId>) -> Result<(), StoreError> {
        match parent_id {
            Some(parent) if !self.accounts.contains_key(&parent) => Err(
                StoreError::ForeignKeyViolation(format!("parent account {parent} does not exist")),
            ),
            _ => Ok(()),
        }
    }
}

/// Failures to inject into the next unit of work.
#[derive(Debug, Clone, Copy, Default)]
struct Faults {
    /// 1-based index of the detail insert that fails.
    detail_at: Option<usize>,
    rollback: bool,
}

/// A [`LedgerStore`] kept entirely in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    state: Arc<Mutex<MemoryState>>,
    #[cfg(test)]
    faults: Arc<std::sync::Mutex<Faults>>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the `n`th detail insert (1-based) of the next unit of work fail.
    #[cfg(test)]
    pub(crate) fn fail_detail_insert_at(&self, n: usize) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.detail_at = Some(n);
        }
    }

    /// Makes the rollback of the next unit of work fail.
    #[cfg(test)]
    pub(crate) fn fail_next_rollback(&self) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.rollback = true;
        }
    }

    #[cfg(test)]
    fn take_faults(&self) -> Faults {
        self.faults
            .lock()
            .map(|mut faults| std::mem::take(&mut *faults))
            .unwrap_or_default()
    }

    #[cfg(not(test))]
    #[allow(clippy::unused_self)]
    fn take_faults(&self) -> Faults {
        Faults::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let faults = self.take_faults();
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnitOfWork {
            guard,
            staged,
            detail_inserts: 0,
            faults,
        }))
    }

    async fn list_accounts(&self) -> Result<Vec<AccountSummary>, StoreError> {
        let state = self.state.lock().await;
        let mut accounts: Vec<_> = state.accounts.values().map(|a| state.summarize(a)).collect();
        accounts.sort_by(|a, b| a.account.account_code.cmp(&b.account.account_code));
        Ok(accounts)
    }

    async fn find_account(&self, id: AccountId) -> Result<Option<AccountSummary>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.accounts.get(&id).map(|a| state.summarize(a)))
    }

    async fn list_journal_entries(
        &self,
        filter: &JournalFilter,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        let state = self.state.lock().await;
        let mut entries: Vec<_> = state
            .entries
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        entries.sort_by(|a, b| (b.entry_date, b.id).cmp(&(a.entry_date, a.id)));
        Ok(entries)
    }

    async fn list_journal_details(
        &self,
        journal_ids: &[JournalEntryId],
    ) -> Result<Vec<JournalDetailView>, StoreError> {
        let wanted: HashSet<_> = journal_ids.iter().copied().collect();
        let state = self.state.lock().await;
        Ok(state
            .details
            .iter()
            .filter(|d| wanted.contains(&d.journal_id))
            .map(|d| {
                let (account_code, account_name) = state
                    .accounts
                    .get(&d.account_id)
                    .map(|a| (a.account_code.clone(), a.account_name.clone()))
                    .unwrap_or_default();
                JournalDetailView {
                    detail: d.clone(),
                    account_code,
                    account_name,
                }
            })
            .collect())
    }

    async fn posted_totals(
        &self,
        as_of: NaiveDate,
    ) -> Result<HashMap<AccountId, LineTotals>, StoreError> {
        let state = self.state.lock().await;
        let mut totals: HashMap<AccountId, LineTotals> = HashMap::new();
        for detail in &state.details {
            let counts = state.entries.get(&detail.journal_id).is_some_and(|e| {
                e.status == JournalStatus::Posted && e.entry_date <= as_of
            });
            if counts {
                totals
                    .entry(detail.account_id)
                    .or_default()
                    .add(detail.debit, detail.credit);
            }
        }
        Ok(totals)
    }
}

struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
    detail_inserts: usize,
    faults: Faults,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn find_account(&mut self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.staged.accounts.get(&id).cloned())
    }

    async fn find_account_by_code(&mut self, code: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .staged
            .accounts
            .values()
            .find(|a| a.account_code == code)
            .cloned())
    }

    async fn insert_account(&mut self, input: &NewAccount) -> Result<AccountId, StoreError> {
        if self.staged.code_taken(&input.account_code, None) {
            return Err(StoreError::UniqueViolation(format!(
                "account_code {} already exists",
                input.account_code
            )));
        }
        self.staged.check_parent(input.parent_id)?;

        let id = AccountId::new();
        self.staged.accounts.insert(
            id,
            Account {
                id,
                account_code: input.account_code.clone(),
                account_name: input.account_name.clone(),
                account_type: input.account_type,
                description: input.description.clone(),
                parent_id: input.parent_id,
            },
        );
        Ok(id)
    }

    async fn update_account(&mut self, account: &Account) -> Result<(), StoreError> {
        if self.staged.code_taken(&account.account_code, Some(account.id)) {
            return Err(StoreError::UniqueViolation(format!(
                "account_code {} already exists",
                account.account_code
            )));
        }
        self.staged.check_parent(account.parent_id)?;

        match self.staged.accounts.get_mut(&account.id) {
            Some(slot) => {
                slot.clone_from(account);
                Ok(())
            }
            None => Err(StoreError::Backend(format!(
                "account {} does not exist",
                account.id
            ))),
        }
    }

    async fn insert_journal_header(
        &mut self,
        input: &NewJournalEntry,
    ) -> Result<JournalEntryId, StoreError> {
        let id = JournalEntryId::new();
        self.staged.entries.insert(
            id,
            JournalEntry {
                id,
                entry_date: input.entry_date,
                reference_no: input.reference_no.clone(),
                description: input.description.clone(),
                created_by: input.created_by,
                status: input.status,
            },
        );
        Ok(id)
    }

    async fn insert_journal_detail(
        &mut self,
        journal_id: JournalEntryId,
        detail: &NewJournalDetail,
    ) -> Result<JournalDetailId, StoreError> {
        self.detail_inserts += 1;
        if self.faults.detail_at == Some(self.detail_inserts) {
            return Err(StoreError::Backend("injected detail insert failure".to_string()));
        }
        if !self.staged.entries.contains_key(&journal_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "journal entry {journal_id} does not exist"
            )));
        }
        if !self.staged.accounts.contains_key(&detail.account_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "account {} does not exist",
                detail.account_id
            )));
        }

        let id = JournalDetailId::new();
        self.staged.details.push(JournalDetail {
            id,
            journal_id,
            account_id: detail.account_id,
            debit: detail.debit,
            credit: detail.credit,
            description: detail.description.clone(),
        });
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let Self {
            mut guard, staged, ..
        } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        if self.faults.rollback {
            return Err(StoreError::Backend("injected rollback failure".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::AccountType;
    use rust_decimal_macros::dec;
    use tally_shared::types::UserId;

    fn new_account(code: &str, parent_id: Option<AccountId>) -> NewAccount {
        NewAccount {
            account_code: code.to_string(),
            account_name: format!("Account {code}"),
            account_type: AccountType::Asset,
            description: None,
            parent_id,
        }
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_invisible() {
        let store = InMemoryLedgerStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.insert_account(&new_account("1000", None)).await.unwrap();
        drop(uow);

        assert!(store.list_accounts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let store = InMemoryLedgerStore::new();
        let mut uow = store.begin().await.unwrap();
        let parent = uow.insert_account(&new_account("1000", None)).await.unwrap();
        uow.insert_account(&new_account("1100", Some(parent))).await.unwrap();
        uow.commit().await.unwrap();

        let accounts = store.list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].child_count, 1);
        assert_eq!(accounts[1].parent_name.as_deref(), Some("Account 1000"));
    }

    #[tokio::test]
    async fn test_duplicate_code_violates_unique_constraint() {
        let store = InMemoryLedgerStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.insert_account(&new_account("1000", None)).await.unwrap();

        let err = uow.insert_account(&new_account("1000", None)).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn test_missing_parent_violates_foreign_key() {
        let store = InMemoryLedgerStore::new();
        let mut uow = store.begin().await.unwrap();

        let err = uow
            .insert_account(&new_account("1100", Some(AccountId::new())))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation(_)));
    }

    #[tokio::test]
    async fn test_posted_totals_skip_drafts_and_future_entries() {
        let store = InMemoryLedgerStore::new();
        let mut uow = store.begin().await.unwrap();
        let cash = uow.insert_account(&new_account("1000", None)).await.unwrap();
        let jan = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        for (date, status, amount) in [
            (jan, JournalStatus::Posted, dec!(100)),
            (jan, JournalStatus::Draft, dec!(7)),
            (feb, JournalStatus::Posted, dec!(50)),
        ] {
            let input = NewJournalEntry {
                entry_date: date,
                reference_no: None,
                description: None,
                created_by: UserId::new(),
                status,
                details: vec![],
            };
            let journal = uow.insert_journal_header(&input).await.unwrap();
            let line = NewJournalDetail {
                account_id: cash,
                debit: amount,
                credit: dec!(0),
                description: None,
            };
            uow.insert_journal_detail(journal, &line).await.unwrap();
        }
        uow.commit().await.unwrap();

        let totals = store
            .posted_totals(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
            .await
            .unwrap();
        assert_eq!(totals.get(&cash), Some(&LineTotals::new(dec!(100), dec!(0))));
    }
}
