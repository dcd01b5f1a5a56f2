//! Chart-of-accounts management.

use std::sync::Arc;

use tally_shared::types::AccountId;

use super::hierarchy::MAX_HIERARCHY_DEPTH;
use super::types::{Account, AccountPatch, AccountSummary, NewAccount};
use crate::ledger::LedgerError;
use crate::ledger::service::abandon;
use crate::store::{LedgerStore, StoreError, UnitOfWork};

/// Lists, creates and updates accounts over a [`LedgerStore`].
#[derive(Clone)]
pub struct ChartOfAccounts {
    store: Arc<dyn LedgerStore>,
}

impl ChartOfAccounts {
    /// Creates a service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Lists every account ordered by code.
    pub async fn list_accounts(&self) -> Result<Vec<AccountSummary>, LedgerError> {
        Ok(self.store.list_accounts().await?)
    }

    /// Fetches one account.
    pub async fn get_account(&self, id: AccountId) -> Result<AccountSummary, LedgerError> {
        self.store
            .find_account(id)
            .await?
            .ok_or(LedgerError::AccountNotFound(id))
    }

    /// Creates an account and returns its ID.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Validation`] if code or name is blank
    /// - [`LedgerError::DuplicateCode`] if the code is already in use
    /// - [`LedgerError::ParentNotFound`] if the parent does not exist
    pub async fn create_account(&self, input: NewAccount) -> Result<AccountId, LedgerError> {
        input.validate()?;

        let mut uow = self.store.begin().await?;
        match Self::write_new(uow.as_mut(), &input).await {
            Ok(id) => {
                uow.commit().await?;
                Ok(id)
            }
            Err(err) => Err(abandon(uow, err).await),
        }
    }

    async fn write_new(
        uow: &mut dyn UnitOfWork,
        input: &NewAccount,
    ) -> Result<AccountId, LedgerError> {
        if uow.find_account_by_code(&input.account_code).await?.is_some() {
            return Err(LedgerError::DuplicateCode(input.account_code.clone()));
        }
        if let Some(parent) = input.parent_id
            && uow.find_account(parent).await?.is_none()
        {
            return Err(LedgerError::ParentNotFound(parent));
        }

        // A concurrent insert of the same code can still slip past the pre-check.
        uow.insert_account(input).await.map_err(|e| match e {
            StoreError::UniqueViolation(_) => LedgerError::DuplicateCode(input.account_code.clone()),
            other => LedgerError::Store(other),
        })
    }

    /// Applies `patch` to an existing account and returns the result.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::AccountNotFound`] if the account does not exist
    /// - [`LedgerError::ParentNotFound`] if the new parent does not exist
    /// - [`LedgerError::InvalidParent`] if the new parent is the account or one of its descendants
    /// - [`LedgerError::Validation`] if the new parent sits deeper than [`MAX_HIERARCHY_DEPTH`]
    pub async fn update_account(
        &self,
        id: AccountId,
        patch: AccountPatch,
    ) -> Result<Account, LedgerError> {
        patch.validate()?;

        let mut uow = self.store.begin().await?;
        match Self::write_patch(uow.as_mut(), id, &patch).await {
            Ok(account) => {
                uow.commit().await?;
                Ok(account)
            }
            Err(err) => Err(abandon(uow, err).await),
        }
    }

    async fn write_patch(
        uow: &mut dyn UnitOfWork,
        id: AccountId,
        patch: &AccountPatch,
    ) -> Result<Account, LedgerError> {
        let mut account = uow
            .find_account(id)
            .await?
            .ok_or(LedgerError::AccountNotFound(id))?;

        if let Some(Some(parent)) = patch.parent_id {
            Self::check_parent(uow, id, parent).await?;
        }

        patch.apply(&mut account);
        uow.update_account(&account).await?;
        Ok(account)
    }

    /// Walks up from `parent`; reaching `id` means the move would close a cycle.
    async fn check_parent(
        uow: &mut dyn UnitOfWork,
        id: AccountId,
        parent: AccountId,
    ) -> Result<(), LedgerError> {
        let mut current = Some(parent);
        let mut depth = 0;

        while let Some(ancestor) = current {
            if ancestor == id {
                return Err(LedgerError::InvalidParent(parent));
            }
            if depth > MAX_HIERARCHY_DEPTH {
                return Err(LedgerError::Validation(format!(
                    "Account hierarchy is deeper than {MAX_HIERARCHY_DEPTH} levels"
                )));
            }
            let Some(record) = uow.find_account(ancestor).await? else {
                return Err(LedgerError::ParentNotFound(ancestor));
            };
            current = record.parent_id;
            depth += 1;
        }
        Ok(())
    }
}
