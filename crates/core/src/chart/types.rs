//! Chart of accounts domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tally_shared::types::AccountId;
use thiserror::Error;

use crate::ledger::LedgerError;

/// Account classification.
///
/// Only asset, liability and equity accounts appear on the balance sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned.
    Asset,
    /// Obligations owed.
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

/// The side on which an account's balance normally grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalBalance {
    /// Asset/Expense: balance = debit - credit.
    Debit,
    /// Liability/Equity/Revenue: balance = credit - debit.
    Credit,
}

impl AccountType {
    /// All account types in display order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// Returns the lowercase wire/storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }

    /// Returns the normal balance side for this account type.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns true for types reported on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised account type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid account type '{0}'. Must be one of: asset, liability, equity, revenue, expense")]
pub struct UnknownAccountType(pub String);

impl FromStr for AccountType {
    type Err = UnknownAccountType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownAccountType(s.to_string()))
    }
}

/// A chart-of-accounts record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Unique account code, e.g. "1000".
    pub account_code: String,
    /// Display name.
    pub account_name: String,
    /// Classification.
    pub account_type: AccountType,
    /// Optional description.
    pub description: Option<String>,
    /// Parent account, if any.
    pub parent_id: Option<AccountId>,
}

/// An account enriched with its parent's name and child count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    /// The account itself.
    pub account: Account,
    /// Name of the parent account, if any.
    pub parent_name: Option<String>,
    /// Number of direct children.
    pub child_count: u64,
}

impl AccountSummary {
    /// Returns true if any account names this one as its parent.
    #[must_use]
    pub const fn has_children(&self) -> bool {
        self.child_count > 0
    }
}

/// Longest accepted account code, in characters.
pub const MAX_ACCOUNT_CODE_LEN: usize = 20;

/// Longest accepted account name, in characters.
pub const MAX_ACCOUNT_NAME_LEN: usize = 255;

fn check_len(field: &str, value: &str, max: usize) -> Result<(), LedgerError> {
    if value.chars().count() > max {
        return Err(LedgerError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Unique account code.
    pub account_code: String,
    /// Display name.
    pub account_name: String,
    /// Classification.
    pub account_type: AccountType,
    /// Optional description.
    pub description: Option<String>,
    /// Optional parent account.
    pub parent_id: Option<AccountId>,
}

impl NewAccount {
    /// Checks that code and name are present and fit their columns.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.account_code.trim().is_empty() {
            return Err(LedgerError::Validation("Account code is required".to_string()));
        }
        if self.account_name.trim().is_empty() {
            return Err(LedgerError::Validation("Account name is required".to_string()));
        }
        check_len("Account code", &self.account_code, MAX_ACCOUNT_CODE_LEN)?;
        check_len("Account name", &self.account_name, MAX_ACCOUNT_NAME_LEN)
    }
}

/// Partial update for an account.
///
/// `None` leaves a field unchanged. For nullable fields, `Some(None)` clears
/// the stored value. The account code is immutable.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    /// New display name.
    pub account_name: Option<String>,
    /// New classification.
    pub account_type: Option<AccountType>,
    /// New description (`Some(None)` clears it).
    pub description: Option<Option<String>>,
    /// New parent (`Some(None)` detaches the account).
    pub parent_id: Option<Option<AccountId>>,
}

impl AccountPatch {
    /// Returns true if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.account_name.is_none()
            && self.account_type.is_none()
            && self.description.is_none()
            && self.parent_id.is_none()
    }

    /// Rejects a blank or over-long replacement name.
    pub fn validate(&self) -> Result<(), LedgerError> {
        match &self.account_name {
            Some(name) if name.trim().is_empty() => Err(LedgerError::Validation(
                "Account name cannot be empty".to_string(),
            )),
            Some(name) => check_len("Account name", name, MAX_ACCOUNT_NAME_LEN),
            None => Ok(()),
        }
    }

    /// Applies the supplied fields to `account`.
    pub fn apply(&self, account: &mut Account) {
        if let Some(name) = &self.account_name {
            account.account_name.clone_from(name);
        }
        if let Some(account_type) = self.account_type {
            account.account_type = account_type;
        }
        if let Some(description) = &self.description {
            account.description.clone_from(description);
        }
        if let Some(parent_id) = self.parent_id {
            account.parent_id = parent_id;
        }
    }
}
