//! Report generation service.

use std::collections::HashMap;

use chrono::NaiveDate;
use tally_shared::types::AccountId;

use super::types::{BalanceSheetLine, BalanceSheetReport, BalanceSheetSection};
use crate::chart::{AccountType, HierarchyNode};
use crate::ledger::LineTotals;

/// Pure report assembly; the inputs come from a store.
pub struct ReportService;

impl ReportService {
    /// Generates a balance sheet.
    ///
    /// Every asset, liability and equity account in `hierarchy` gets a line,
    /// with zero amounts when `totals` has no entry for it. Revenue and
    /// expense accounts are left out.
    #[must_use]
    pub fn generate_balance_sheet(
        as_of: NaiveDate,
        hierarchy: &[HierarchyNode],
        totals: &HashMap<AccountId, LineTotals>,
    ) -> BalanceSheetReport {
        let mut assets = BalanceSheetSection::default();
        let mut liabilities = BalanceSheetSection::default();
        let mut equity = BalanceSheetSection::default();

        for node in hierarchy {
            let section = match node.account.account_type {
                AccountType::Asset => &mut assets,
                AccountType::Liability => &mut liabilities,
                AccountType::Equity => &mut equity,
                AccountType::Revenue | AccountType::Expense => continue,
            };
            let sums = totals.get(&node.account.id).copied().unwrap_or_default();
            Self::add_to_section(section, Self::line(node, sums));
        }

        for section in [&mut assets, &mut liabilities, &mut equity] {
            section
                .accounts
                .sort_by(|a, b| a.account_code.cmp(&b.account_code));
        }

        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let total_equity = equity.total;
        let liabilities_and_equity = total_liabilities + total_equity;

        BalanceSheetReport {
            as_of,
            assets,
            liabilities,
            equity,
            total_assets,
            total_liabilities,
            total_equity,
            liabilities_and_equity,
            is_balanced: total_assets == liabilities_and_equity,
        }
    }

    fn line(node: &HierarchyNode, sums: LineTotals) -> BalanceSheetLine {
        let account = &node.account;
        BalanceSheetLine {
            id: account.id,
            account_code: account.account_code.clone(),
            account_name: account.account_name.clone(),
            account_type: account.account_type,
            parent_id: account.parent_id,
            level: node.level,
            total_debit: sums.debit,
            total_credit: sums.credit,
            net_debit: sums.net_debit(),
            balance: sums.balance(account.account_type.normal_balance()),
        }
    }

    fn add_to_section(section: &mut BalanceSheetSection, line: BalanceSheetLine) {
        section.total += line.balance;
        section.accounts.push(line);
    }
}
