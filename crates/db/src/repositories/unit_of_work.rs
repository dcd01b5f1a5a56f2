//! Write side of the PostgreSQL ledger store.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseTransaction, EntityTrait,
    QueryFilter, Set,
};
use tally_core::chart::{Account, NewAccount};
use tally_core::ledger::{NewJournalDetail, NewJournalEntry};
use tally_core::store::{StoreError, UnitOfWork};
use tally_shared::types::{AccountId, JournalDetailId, JournalEntryId};
use tracing::{debug, error};

use super::convert::{self, store_error};
use crate::entities::{chart_of_accounts, journal_details, journal_entries};

/// One database transaction; dropping it without commit rolls back.
pub(crate) struct SeaOrmUnitOfWork {
    txn: DatabaseTransaction,
}

impl SeaOrmUnitOfWork {
    pub(crate) const fn new(txn: DatabaseTransaction) -> Self {
        Self { txn }
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn find_account(&mut self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let model = chart_of_accounts::Entity::find_by_id(id.into_inner())
            .one(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(model.map(convert::account))
    }

    async fn find_account_by_code(&mut self, code: &str) -> Result<Option<Account>, StoreError> {
        let model = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::AccountCode.eq(code))
            .one(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(model.map(convert::account))
    }

    async fn insert_account(&mut self, input: &NewAccount) -> Result<AccountId, StoreError> {
        let id = AccountId::new();
        let now = Utc::now().fixed_offset();
        chart_of_accounts::ActiveModel {
            id: Set(id.into_inner()),
            account_code: Set(input.account_code.clone()),
            account_name: Set(input.account_name.clone()),
            account_type: Set(input.account_type.into()),
            description: Set(input.description.clone()),
            parent_id: Set(input.parent_id.map(AccountId::into_inner)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.txn)
        .await
        .map_err(store_error)?;
        Ok(id)
    }

    async fn update_account(&mut self, account: &Account) -> Result<(), StoreError> {
        chart_of_accounts::ActiveModel {
            id: Unchanged(account.id.into_inner()),
            account_name: Set(account.account_name.clone()),
            account_type: Set(account.account_type.into()),
            description: Set(account.description.clone()),
            parent_id: Set(account.parent_id.map(AccountId::into_inner)),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.txn)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    async fn insert_journal_header(
        &mut self,
        input: &NewJournalEntry,
    ) -> Result<JournalEntryId, StoreError> {
        let id = JournalEntryId::new();
        journal_entries::ActiveModel {
            id: Set(id.into_inner()),
            entry_date: Set(input.entry_date),
            reference_no: Set(input.reference_no.clone()),
            description: Set(input.description.clone()),
            created_by: Set(input.created_by.into_inner()),
            status: Set(input.status.into()),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(&self.txn)
        .await
        .map_err(store_error)?;
        Ok(id)
    }

    async fn insert_journal_detail(
        &mut self,
        journal_id: JournalEntryId,
        detail: &NewJournalDetail,
    ) -> Result<JournalDetailId, StoreError> {
        let id = JournalDetailId::new();
        journal_details::ActiveModel {
            id: Set(id.into_inner()),
            journal_id: Set(journal_id.into_inner()),
            account_id: Set(detail.account_id.into_inner()),
            debit: Set(detail.debit),
            credit: Set(detail.credit),
            description: Set(detail.description.clone()),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(&self.txn)
        .await
        .map_err(store_error)?;
        Ok(id)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.txn.commit().await.map_err(store_error)?;
        debug!("Unit of work committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.txn.rollback().await.map_err(|e| {
            error!(error = %e, "Unit of work rollback failed");
            store_error(e)
        })?;
        debug!("Unit of work rolled back");
        Ok(())
    }
}
