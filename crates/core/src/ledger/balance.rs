//! Debit/credit totals and balance calculation.
//!
//! - Asset/Expense: balance = debit - credit (debit-normal)
//! - Liability/Equity/Revenue: balance = credit - debit (credit-normal)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chart::NormalBalance;

/// Accumulated debit and credit amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTotals {
    /// Sum of debit amounts.
    pub debit: Decimal,
    /// Sum of credit amounts.
    pub credit: Decimal,
}

impl LineTotals {
    /// Creates totals from explicit sums.
    #[must_use]
    pub const fn new(debit: Decimal, credit: Decimal) -> Self {
        Self { debit, credit }
    }

    /// Adds one line.
    pub fn add(&mut self, debit: Decimal, credit: Decimal) {
        self.debit += debit;
        self.credit += credit;
    }

    /// Returns debit minus credit.
    #[must_use]
    pub fn net_debit(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Returns the absolute gap between the two sides.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.net_debit().abs()
    }

    /// Returns the balance on the given normal side.
    #[must_use]
    pub fn balance(&self, side: NormalBalance) -> Decimal {
        match side {
            NormalBalance::Debit => self.debit - self.credit,
            NormalBalance::Credit => self.credit - self.debit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_add_accumulates_both_sides() {
        let mut totals = LineTotals::default();
        totals.add(dec!(100), dec!(0));
        totals.add(dec!(0), dec!(40));
        totals.add(dec!(5.50), dec!(5.50));

        assert_eq!(totals, LineTotals::new(dec!(105.50), dec!(45.50)));
        assert_eq!(totals.net_debit(), dec!(60));
    }

    #[test]
    fn test_debit_normal_balance() {
        let totals = LineTotals::new(dec!(1000), dec!(300));
        assert_eq!(totals.balance(NormalBalance::Debit), dec!(700));
    }

    #[test]
    fn test_credit_normal_balance() {
        let totals = LineTotals::new(dec!(300), dec!(1000));
        assert_eq!(totals.balance(NormalBalance::Credit), dec!(700));
        assert_eq!(totals.net_debit(), dec!(-700));
    }

    #[test]
    fn test_difference_is_absolute() {
        assert_eq!(LineTotals::new(dec!(10), dec!(25)).difference(), dec!(15));
        assert_eq!(LineTotals::new(dec!(25), dec!(10)).difference(), dec!(15));
    }
}
