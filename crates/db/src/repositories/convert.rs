//! Row to domain conversions and error classification.

use sea_orm::{DbErr, SqlErr};
use tally_core::chart::{Account, AccountType};
use tally_core::ledger::{JournalDetail, JournalEntry, JournalStatus};
use tally_core::store::StoreError;
use tally_shared::types::{AccountId, JournalDetailId, JournalEntryId, UserId};

use crate::entities::{chart_of_accounts, journal_details, journal_entries, sea_orm_active_enums};

/// Maps constraint violations to their store error; everything else is a backend failure.
pub(crate) fn store_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::UniqueViolation(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            StoreError::ForeignKeyViolation(detail)
        }
        _ => StoreError::Backend(err.to_string()),
    }
}

impl From<sea_orm_active_enums::AccountType> for AccountType {
    fn from(value: sea_orm_active_enums::AccountType) -> Self {
        match value {
            sea_orm_active_enums::AccountType::Asset => Self::Asset,
            sea_orm_active_enums::AccountType::Liability => Self::Liability,
            sea_orm_active_enums::AccountType::Equity => Self::Equity,
            sea_orm_active_enums::AccountType::Revenue => Self::Revenue,
            sea_orm_active_enums::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for sea_orm_active_enums::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<sea_orm_active_enums::JournalStatus> for JournalStatus {
    fn from(value: sea_orm_active_enums::JournalStatus) -> Self {
        match value {
            sea_orm_active_enums::JournalStatus::Draft => Self::Draft,
            sea_orm_active_enums::JournalStatus::Posted => Self::Posted,
            sea_orm_active_enums::JournalStatus::Void => Self::Void,
        }
    }
}

impl From<JournalStatus> for sea_orm_active_enums::JournalStatus {
    fn from(value: JournalStatus) -> Self {
        match value {
            JournalStatus::Draft => Self::Draft,
            JournalStatus::Posted => Self::Posted,
            JournalStatus::Void => Self::Void,
        }
    }
}

pub(crate) fn account(model: chart_of_accounts::Model) -> Account {
    Account {
        id: AccountId::from_uuid(model.id),
        account_code: model.account_code,
        account_name: model.account_name,
        account_type: model.account_type.into(),
        description: model.description,
        parent_id: model.parent_id.map(AccountId::from_uuid),
    }
}

pub(crate) fn journal_entry(model: journal_entries::Model) -> JournalEntry {
    JournalEntry {
        id: JournalEntryId::from_uuid(model.id),
        entry_date: model.entry_date,
        reference_no: model.reference_no,
        description: model.description,
        created_by: UserId::from_uuid(model.created_by),
        status: model.status.into(),
    }
}

pub(crate) fn journal_detail(model: journal_details::Model) -> JournalDetail {
    JournalDetail {
        id: JournalDetailId::from_uuid(model.id),
        journal_id: JournalEntryId::from_uuid(model.journal_id),
        account_id: AccountId::from_uuid(model.account_id),
        debit: model.debit,
        credit: model.credit,
        description: model.description,
    }
}

/// Parses an `account_type` column read back as text.
pub(crate) fn parse_account_type(raw: &str) -> Result<AccountType, StoreError> {
    raw.parse()
        .map_err(|e: tally_core::chart::UnknownAccountType| StoreError::Backend(e.to_string()))
}
