//! Property-based tests for balanced-entry validation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, UserId};

use super::error::LedgerError;
use super::types::{JournalStatus, NewJournalDetail, NewJournalEntry};
use super::validation::{BALANCE_TOLERANCE, validate_entry};

/// Strategy to generate a non-negative amount (0.00 to 1,000,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a strictly negative amount.
fn negative_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

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
        entry_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap_or_default(),
        reference_no: None,
        description: None,
        created_by: UserId::new(),
        status: JournalStatus::Posted,
        details,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Mirroring every debit with an equal credit always validates.
    #[test]
    fn prop_mirrored_entry_is_balanced(amounts in prop::collection::vec(amount(), 1..10)) {
        let mut details: Vec<_> = amounts.iter().map(|a| line(*a, Decimal::ZERO)).collect();
        details.extend(amounts.iter().map(|a| line(Decimal::ZERO, *a)));

        let totals = validate_entry(&entry(details));
        prop_assert!(totals.is_ok());
        let totals = totals.unwrap_or_default();
        prop_assert_eq!(totals.debit, totals.credit);
    }

    /// Acceptance is exactly |debit - credit| <= 0.01.
    #[test]
    fn prop_accepted_iff_within_tolerance(debit in amount(), credit in amount()) {
        let result = validate_entry(&entry(vec![line(debit, Decimal::ZERO), line(Decimal::ZERO, credit)]));
        let within = (debit - credit).abs() <= BALANCE_TOLERANCE;

        prop_assert_eq!(result.is_ok(), within);
        if !within {
            let is_unbalanced = matches!(
                result,
                Err(LedgerError::UnbalancedEntry { debit: d, credit: c }) if d == debit && c == credit
            );
            prop_assert!(is_unbalanced);
        }
    }

    /// Any negative amount rejects the whole entry.
    #[test]
    fn prop_negative_amount_rejected(
        amounts in prop::collection::vec(amount(), 1..6),
        negative in negative_amount(),
        on_debit_side in any::<bool>(),
    ) {
        let mut details: Vec<_> = amounts.iter().map(|a| line(*a, *a)).collect();
        details.push(if on_debit_side {
            line(negative, Decimal::ZERO)
        } else {
            line(Decimal::ZERO, negative)
        });

        let result = validate_entry(&entry(details));
        prop_assert!(matches!(result, Err(LedgerError::NegativeAmount)));
    }

    /// Totals equal the sums of the supplied lines.
    #[test]
    fn prop_totals_are_line_sums(pairs in prop::collection::vec((amount(), amount()), 1..10)) {
        let debit: Decimal = pairs.iter().map(|(d, _)| *d).sum();
        let credit: Decimal = pairs.iter().map(|(_, c)| *c).sum();
        let mut details: Vec<_> = pairs.iter().map(|(d, c)| line(*d, *c)).collect();
        // Balance the entry with one closing line.
        if debit > credit {
            details.push(line(Decimal::ZERO, debit - credit));
        } else {
            details.push(line(credit - debit, Decimal::ZERO));
        }

        let totals = validate_entry(&entry(details));
        prop_assert!(totals.is_ok());
        let totals = totals.unwrap_or_default();
        prop_assert_eq!(totals.debit, debit.max(credit));
        prop_assert_eq!(totals.credit, debit.max(credit));
    }
}
