//! Balanced-entry validation.
//!
//! An entry is accepted when it has at least one line, no line carries a
//! negative amount, and the debit and credit sums differ by no more than
//! [`BALANCE_TOLERANCE`]. A single line may carry both a debit and a credit.
//!
//! Amounts are stored as `NUMERIC(19,4)`, so each one must have at most
//! [`AMOUNT_SCALE`] decimal places and stay below [`AMOUNT_LIMIT`].

use rust_decimal::Decimal;

use super::balance::LineTotals;
use super::error::LedgerError;
use super::types::NewJournalEntry;

/// Maximum accepted gap between total debits and total credits (0.01).
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum decimal places of a stored amount.
pub const AMOUNT_SCALE: u32 = 4;

/// Exclusive upper bound of a stored amount (10^15).
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Longest accepted reference number, in characters.
pub const MAX_REFERENCE_LEN: usize = 100;

fn check_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(LedgerError::Validation(format!(
            "Amount {amount} has more than {AMOUNT_SCALE} decimal places"
        )));
    }
    if amount >= AMOUNT_LIMIT {
        return Err(LedgerError::Validation(format!(
            "Amount {amount} must be less than {AMOUNT_LIMIT}"
        )));
    }
    Ok(())
}

/// Validates an entry and returns its totals.
pub fn validate_entry(input: &NewJournalEntry) -> Result<LineTotals, LedgerError> {
    if input.details.is_empty() {
        return Err(LedgerError::EmptyEntry);
    }
    if let Some(reference) = &input.reference_no
        && reference.chars().count() > MAX_REFERENCE_LEN
    {
        return Err(LedgerError::Validation(format!(
            "Reference number must be at most {MAX_REFERENCE_LEN} characters"
        )));
    }

    let mut totals = LineTotals::default();
    for line in &input.details {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        check_amount(line.debit)?;
        check_amount(line.credit)?;
        totals.add(line.debit, line.credit);
    }

    if totals.difference() > BALANCE_TOLERANCE {
        return Err(LedgerError::UnbalancedEntry {
            debit: totals.debit,
            credit: totals.credit,
        });
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{JournalStatus, NewJournalDetail};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tally_shared::types::{AccountId, UserId};

    fn line(debit: Decimal, credit: Decimal) -> NewJournalDetail {
        NewJournalDetail {
            account_id: AccountId::new(),
            debit,
            credit,
            description: None,
        }
    }

    fn entry(details: Vec<NewJournalDetail>) -> NewJournalEntry {
        NewJournalEntry {
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            reference_no: Some("JV-001".to_string()),
            description: Some("Test".to_string()),
            created_by: UserId::new(),
            status: JournalStatus::Posted,
            details,
        }
    }

    #[test]
    fn test_tolerance_is_one_cent() {
        assert_eq!(BALANCE_TOLERANCE, dec!(0.01));
    }

    #[test]
    fn test_balanced_entry() {
        let totals = validate_entry(&entry(vec![
            line(dec!(100), dec!(0)),
            line(dec!(0), dec!(100)),
        ]))
        .unwrap();
        assert_eq!(totals, LineTotals::new(dec!(100), dec!(100)));
    }

    #[test]
    fn test_gap_within_tolerance_is_accepted() {
        let result = validate_entry(&entry(vec![
            line(dec!(100.00), dec!(0)),
            line(dec!(0), dec!(99.99)),
        ]));
        assert!(result.is_ok());
    }

    #[test]
    fn test_gap_beyond_tolerance_is_rejected() {
        let result = validate_entry(&entry(vec![
            line(dec!(100.00), dec!(0)),
            line(dec!(0), dec!(99.98)),
        ]));
        assert!(matches!(
            result,
            Err(LedgerError::UnbalancedEntry { debit, credit })
                if debit == dec!(100.00) && credit == dec!(99.98)
        ));
    }

    #[test]
    fn test_empty_entry_is_rejected() {
        assert!(matches!(
            validate_entry(&entry(vec![])),
            Err(LedgerError::EmptyEntry)
        ));
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let result = validate_entry(&entry(vec![
            line(dec!(-50), dec!(0)),
            line(dec!(0), dec!(-50)),
        ]));
        assert!(matches!(result, Err(LedgerError::NegativeAmount)));
    }

    #[test]
    fn test_amount_limit_is_ten_to_the_fifteenth() {
        assert_eq!(AMOUNT_LIMIT, dec!(1000000000000000));
    }

    #[test]
    fn test_four_decimal_places_are_accepted() {
        let result = validate_entry(&entry(vec![
            line(dec!(10.1234), dec!(0)),
            line(dec!(0), dec!(10.12340000)),
        ]));
        assert!(result.is_ok());
    }

    #[test]
    fn test_fifth_decimal_place_is_rejected() {
        let result = validate_entry(&entry(vec![
            line(dec!(10.00001), dec!(0)),
            line(dec!(0), dec!(10.00001)),
        ]));
        assert!(matches!(result, Err(LedgerError::Validation(msg)) if msg.contains("decimal places")));
    }

    #[test]
    fn test_amount_beyond_column_range_is_rejected() {
        let result = validate_entry(&entry(vec![
            line(dec!(1000000000000000), dec!(0)),
            line(dec!(0), dec!(1000000000000000)),
        ]));
        assert!(matches!(result, Err(LedgerError::Validation(_))));

        let largest = dec!(999999999999999.9999);
        assert!(validate_entry(&entry(vec![line(largest, dec!(0)), line(dec!(0), largest)])).is_ok());
    }

    #[test]
    fn test_over_long_reference_is_rejected() {
        let mut input = entry(vec![line(dec!(1), dec!(0)), line(dec!(0), dec!(1))]);
        input.reference_no = Some("R".repeat(MAX_REFERENCE_LEN + 1));
        assert!(matches!(validate_entry(&input), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_line_with_both_sides_is_allowed() {
        let result = validate_entry(&entry(vec![line(dec!(25), dec!(25))]));
        assert!(result.is_ok());
    }
}
