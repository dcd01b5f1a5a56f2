//! Ledger error types.
//!
//! Every account and journal operation reports failures through
//! [`LedgerError`]. Each variant maps to a stable error code and an HTTP
//! status so that outer layers never have to inspect messages.

use rust_decimal::Decimal;
use tally_shared::types::AccountId;
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Journal entry has no detail lines.
    #[error("Journal entry must have at least one detail line")]
    EmptyEntry,

    /// Sum of debits differs from sum of credits beyond tolerance.
    #[error("Debits and credits must be equal. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// A detail line carries a negative amount.
    #[error("Debit and credit amounts cannot be negative")]
    NegativeAmount,

    /// Generic input validation failure.
    #[error("Validation error: {0}")]
    Validation(String),

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Referenced parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(AccountId),

    /// Account code already in use.
    #[error("Account code already exists: {0}")]
    DuplicateCode(String),

    /// Parent would make the account its own ancestor.
    #[error("Account {0} cannot be used as parent: it would create a cycle")]
    InvalidParent(AccountId),

    // ========== Store Errors ==========
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Rolling back after `cause` failed too.
    #[error("{cause} (rollback failed: {rollback})")]
    RollbackFailed {
        /// The error that triggered the rollback.
        cause: Box<LedgerError>,
        /// Why the rollback failed.
        rollback: StoreError,
    },
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyEntry => "EMPTY_ENTRY",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::InvalidParent(_) => "INVALID_PARENT",
            Self::Store(_) => "STORE_ERROR",
            Self::RollbackFailed { .. } => "ROLLBACK_FAILED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::EmptyEntry
            | Self::UnbalancedEntry { .. }
            | Self::NegativeAmount
            | Self::Validation(_)
            | Self::DuplicateCode(_)
            | Self::InvalidParent(_) => 400,
            Self::AccountNotFound(_) | Self::ParentNotFound(_) => 404,
            Self::Store(_) | Self::RollbackFailed { .. } => 500,
        }
    }

    /// Returns true if a referenced record was missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::AccountNotFound(_) | Self::ParentNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(LedgerError::EmptyEntry, 400, "EMPTY_ENTRY")]
    #[case(
        LedgerError::UnbalancedEntry { debit: dec!(100), credit: dec!(90) },
        400,
        "UNBALANCED_ENTRY"
    )]
    #[case(LedgerError::NegativeAmount, 400, "NEGATIVE_AMOUNT")]
    #[case(LedgerError::DuplicateCode("1000".into()), 400, "DUPLICATE_CODE")]
    #[case(LedgerError::AccountNotFound(AccountId::new()), 404, "ACCOUNT_NOT_FOUND")]
    #[case(LedgerError::ParentNotFound(AccountId::new()), 404, "PARENT_NOT_FOUND")]
    #[case(LedgerError::InvalidParent(AccountId::new()), 400, "INVALID_PARENT")]
    #[case(LedgerError::Store(StoreError::Backend("down".into())), 500, "STORE_ERROR")]
    #[case(
        LedgerError::RollbackFailed {
            cause: Box::new(LedgerError::EmptyEntry),
            rollback: StoreError::Backend("down".into()),
        },
        500,
        "ROLLBACK_FAILED"
    )]
    fn test_error_mapping(#[case] err: LedgerError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.http_status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_unbalanced_message_includes_totals() {
        let err = LedgerError::UnbalancedEntry {
            debit: dec!(100.00),
            credit: dec!(99.98),
        };
        assert_eq!(
            err.to_string(),
            "Debits and credits must be equal. Debit: 100.00, Credit: 99.98"
        );
    }

    #[test]
    fn test_rollback_failure_message_keeps_both_causes() {
        let err = LedgerError::RollbackFailed {
            cause: Box::new(LedgerError::DuplicateCode("1000".into())),
            rollback: StoreError::Backend("connection reset".into()),
        };
        let message = err.to_string();
        assert!(message.contains("Account code already exists: 1000"));
        assert!(message.contains("connection reset"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(LedgerError::AccountNotFound(AccountId::new()).is_not_found());
        assert!(!LedgerError::EmptyEntry.is_not_found());
    }
}
