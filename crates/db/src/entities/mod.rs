//! `SeaORM` entities for the ledger schema.

#![allow(missing_docs)]

pub mod chart_of_accounts;
pub mod journal_details;
pub mod journal_entries;
pub mod sea_orm_active_enums;
