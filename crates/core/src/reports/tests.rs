//! Tests for balance sheet assembly.

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_shared::types::AccountId;

use super::service::ReportService;
use crate::chart::{Account, AccountType, HierarchyNode, flatten_hierarchy};
use crate::ledger::LineTotals;

fn account(code: &str, account_type: AccountType, parent: Option<AccountId>) -> Account {
    Account {
        id: AccountId::new(),
        account_code: code.to_string(),
        account_name: format!("Account {code}"),
        account_type,
        description: None,
        parent_id: parent,
    }
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
}

#[test]
fn test_empty_ledger_yields_zero_report() {
    let report = ReportService::generate_balance_sheet(as_of(), &[], &HashMap::new());

    assert_eq!(report.as_of, as_of());
    assert!(report.assets.accounts.is_empty());
    assert_eq!(report.total_assets, Decimal::ZERO);
    assert_eq!(report.liabilities_and_equity, Decimal::ZERO);
    assert!(report.is_balanced);
}

#[test]
fn test_accounts_without_activity_show_zero() {
    let cash = account("1000", AccountType::Asset, None);
    let nodes = flatten_hierarchy(std::slice::from_ref(&cash));

    let report = ReportService::generate_balance_sheet(as_of(), &nodes, &HashMap::new());

    assert_eq!(report.assets.accounts.len(), 1);
    let line = &report.assets.accounts[0];
    assert_eq!(line.total_debit, Decimal::ZERO);
    assert_eq!(line.total_credit, Decimal::ZERO);
    assert_eq!(line.balance, Decimal::ZERO);
}

#[test]
fn test_revenue_and_expense_are_excluded() {
    let accounts = vec![
        account("1000", AccountType::Asset, None),
        account("4000", AccountType::Revenue, None),
        account("5000", AccountType::Expense, None),
    ];
    let nodes = flatten_hierarchy(&accounts);

    let report = ReportService::generate_balance_sheet(as_of(), &nodes, &HashMap::new());

    assert_eq!(report.assets.accounts.len(), 1);
    assert!(report.liabilities.accounts.is_empty());
    assert!(report.equity.accounts.is_empty());
}

#[test]
fn test_owner_investment_balances() {
    let cash = account("1000", AccountType::Asset, None);
    let capital = account("3000", AccountType::Equity, None);
    let nodes = flatten_hierarchy(&[cash.clone(), capital.clone()]);
    let totals = HashMap::from([
        (cash.id, LineTotals::new(dec!(100), dec!(0))),
        (capital.id, LineTotals::new(dec!(0), dec!(100))),
    ]);

    let report = ReportService::generate_balance_sheet(as_of(), &nodes, &totals);

    assert_eq!(report.total_assets, dec!(100));
    assert_eq!(report.total_equity, dec!(100));
    assert_eq!(report.total_liabilities, dec!(0));
    assert_eq!(report.liabilities_and_equity, dec!(100));
    assert!(report.is_balanced);

    let equity_line = &report.equity.accounts[0];
    assert_eq!(equity_line.net_debit, dec!(-100));
    assert_eq!(equity_line.balance, dec!(100));
}

#[test]
fn test_lines_carry_level_and_parent() {
    let assets = account("1000", AccountType::Asset, None);
    let cash = account("1100", AccountType::Asset, Some(assets.id));
    let nodes = flatten_hierarchy(&[cash.clone(), assets.clone()]);

    let report = ReportService::generate_balance_sheet(as_of(), &nodes, &HashMap::new());

    let lines = &report.assets.accounts;
    assert_eq!(lines[0].account_code, "1000");
    assert_eq!(lines[0].level, 0);
    assert_eq!(lines[1].account_code, "1100");
    assert_eq!(lines[1].level, 1);
    assert_eq!(lines[1].parent_id, Some(assets.id));
}

#[test]
fn test_section_is_ordered_by_code() {
    let parent = account("1500", AccountType::Asset, None);
    let child = account("1510", AccountType::Asset, Some(parent.id));
    let other_root = account("1200", AccountType::Asset, None);
    let nodes = vec![
        HierarchyNode { account: parent.clone(), level: 0 },
        HierarchyNode { account: child, level: 1 },
        HierarchyNode { account: other_root, level: 0 },
    ];

    let report = ReportService::generate_balance_sheet(as_of(), &nodes, &HashMap::new());

    let codes: Vec<_> = report
        .assets
        .accounts
        .iter()
        .map(|l| l.account_code.as_str())
        .collect();
    assert_eq!(codes, vec!["1200", "1500", "1510"]);
}

#[test]
fn test_report_serializes_with_camel_case_keys() {
    let cash = account("1000", AccountType::Asset, None);
    let nodes = flatten_hierarchy(std::slice::from_ref(&cash));
    let totals = HashMap::from([(cash.id, LineTotals::new(dec!(10.50), dec!(0)))]);

    let report = ReportService::generate_balance_sheet(as_of(), &nodes, &totals);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["asOfDate"], "2024-12-31");
    assert_eq!(json["totalAssets"], "10.50");
    assert_eq!(json["liabilitiesAndEquity"], "0");
    assert_eq!(json["isBalanced"], false);
    assert_eq!(json["assets"]["accounts"][0]["accountCode"], "1000");
    assert_eq!(json["assets"]["accounts"][0]["totalDebit"], "10.50");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Section totals equal the sum of their lines' balances.
    #[test]
    fn prop_section_totals_sum_balances(
        amounts in prop::collection::vec((0i64..1_000_000, 0i64..1_000_000, 0usize..3), 1..20),
    ) {
        let types = [AccountType::Asset, AccountType::Liability, AccountType::Equity];
        let mut accounts = Vec::new();
        let mut totals = HashMap::new();
        for (i, (d, c, t)) in amounts.iter().enumerate() {
            let acc = account(&format!("{i:04}"), types[*t], None);
            totals.insert(acc.id, LineTotals::new(Decimal::new(*d, 2), Decimal::new(*c, 2)));
            accounts.push(acc);
        }
        let nodes = flatten_hierarchy(&accounts);

        let report = ReportService::generate_balance_sheet(as_of(), &nodes, &totals);

        for section in [&report.assets, &report.liabilities, &report.equity] {
            let sum: Decimal = section.accounts.iter().map(|l| l.balance).sum();
            prop_assert_eq!(section.total, sum);
        }
        prop_assert_eq!(
            report.liabilities_and_equity,
            report.total_liabilities + report.total_equity
        );
        prop_assert_eq!(report.is_balanced, report.total_assets == report.liabilities_and_equity);
    }

    /// Balanced postings always produce a balanced sheet.
    #[test]
    fn prop_balanced_postings_balance_the_sheet(
        postings in prop::collection::vec((1i64..1_000_000, any::<bool>()), 1..20),
    ) {
        let cash = account("1000", AccountType::Asset, None);
        let loan = account("2000", AccountType::Liability, None);
        let capital = account("3000", AccountType::Equity, None);
        let mut totals: HashMap<AccountId, LineTotals> = HashMap::new();
        for (cents, borrowed) in &postings {
            let amount = Decimal::new(*cents, 2);
            totals.entry(cash.id).or_default().add(amount, Decimal::ZERO);
            let source = if *borrowed { loan.id } else { capital.id };
            totals.entry(source).or_default().add(Decimal::ZERO, amount);
        }
        let nodes = flatten_hierarchy(&[cash, loan, capital]);

        let report = ReportService::generate_balance_sheet(as_of(), &nodes, &totals);

        prop_assert!(report.is_balanced);
    }
}
