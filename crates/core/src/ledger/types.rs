//! Journal entry domain types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, JournalDetailId, JournalEntryId, UserId};
use thiserror::Error;

use super::balance::LineTotals;

/// Lifecycle status of a journal entry.
///
/// Only `Posted` entries count toward reported balances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    /// Saved but not yet effective.
    Draft,
    /// Effective; included in reports.
    #[default]
    Posted,
    /// Cancelled; excluded from reports.
    Void,
}

impl JournalStatus {
    /// Returns the lowercase wire/storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Void => "void",
        }
    }
}

impl fmt::Display for JournalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised journal status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid journal status '{0}'. Must be one of: draft, posted, void")]
pub struct UnknownJournalStatus(pub String);

impl FromStr for JournalStatus {
    type Err = UnknownJournalStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "posted" => Ok(Self::Posted),
            "void" => Ok(Self::Void),
            other => Err(UnknownJournalStatus(other.to_string())),
        }
    }
}

/// A persisted journal entry header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry ID.
    pub id: JournalEntryId,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// External reference number.
    pub reference_no: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Caller that recorded the entry.
    pub created_by: UserId,
    /// Lifecycle status.
    pub status: JournalStatus,
}

/// A persisted journal detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalDetail {
    /// Detail ID.
    pub id: JournalDetailId,
    /// Owning journal entry.
    pub journal_id: JournalEntryId,
    /// Account the line posts to.
    pub account_id: AccountId,
    /// Debit amount (>= 0).
    pub debit: Decimal,
    /// Credit amount (>= 0).
    pub credit: Decimal,
    /// Line description.
    pub description: Option<String>,
}

/// A detail line joined with its account's code and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalDetailView {
    /// The detail line.
    pub detail: JournalDetail,
    /// Code of the account posted to.
    pub account_code: String,
    /// Name of the account posted to.
    pub account_name: String,
}

/// A journal entry with its enriched detail lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntryWithDetails {
    /// The entry header.
    pub entry: JournalEntry,
    /// Detail lines in insertion order.
    pub details: Vec<JournalDetailView>,
}

impl JournalEntryWithDetails {
    /// Sums the entry's detail lines.
    #[must_use]
    pub fn totals(&self) -> LineTotals {
        let mut totals = LineTotals::default();
        for line in &self.details {
            totals.add(line.detail.debit, line.detail.credit);
        }
        totals
    }
}

/// Input line for a new journal entry.
#[derive(Debug, Clone)]
pub struct NewJournalDetail {
    /// Account to post to.
    pub account_id: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line description.
    pub description: Option<String>,
}

/// Input for creating a journal entry.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// External reference number.
    pub reference_no: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Caller recording the entry.
    pub created_by: UserId,
    /// Lifecycle status.
    pub status: JournalStatus,
    /// Detail lines.
    pub details: Vec<NewJournalDetail>,
}

/// Criteria for listing journal entries.
///
/// All bounds are inclusive; an absent field does not filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JournalFilter {
    /// Earliest entry date.
    pub start_date: Option<NaiveDate>,
    /// Latest entry date.
    pub end_date: Option<NaiveDate>,
    /// Required status.
    pub status: Option<JournalStatus>,
}

impl JournalFilter {
    /// Returns true if `entry` satisfies every supplied criterion.
    #[must_use]
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        self.start_date.is_none_or(|start| entry.entry_date >= start)
            && self.end_date.is_none_or(|end| entry.entry_date <= end)
            && self.status.is_none_or(|status| entry.status == status)
    }
}
