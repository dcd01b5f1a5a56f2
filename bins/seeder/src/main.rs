//! Seeds a starter chart of accounts for local development.
//!
//! Safe to re-run: accounts whose code already exists are left alone.
//!
//! Usage: cargo run --bin seeder

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use tally_core::chart::{AccountType, ChartOfAccounts, NewAccount};
use tally_core::ledger::LedgerError;
use tally_db::{SeaOrmLedgerStore, connect};
use tally_shared::AppConfig;
use tally_shared::types::AccountId;
use tracing::{info, warn};

/// (code, name, type, parent code)
const STARTER_CHART: &[(&str, &str, AccountType, Option<&str>)] = &[
    ("1000", "Assets", AccountType::Asset, None),
    ("1100", "Cash", AccountType::Asset, Some("1000")),
    ("1200", "Accounts Receivable", AccountType::Asset, Some("1000")),
    ("1500", "Equipment", AccountType::Asset, Some("1000")),
    ("2000", "Liabilities", AccountType::Liability, None),
    ("2100", "Accounts Payable", AccountType::Liability, Some("2000")),
    ("2500", "Loans Payable", AccountType::Liability, Some("2000")),
    ("3000", "Equity", AccountType::Equity, None),
    ("3100", "Owner's Capital", AccountType::Equity, Some("3000")),
    ("3200", "Retained Earnings", AccountType::Equity, Some("3000")),
    ("4000", "Revenue", AccountType::Revenue, None),
    ("4100", "Sales", AccountType::Revenue, Some("4000")),
    ("5000", "Expenses", AccountType::Expense, None),
    ("5100", "Rent", AccountType::Expense, Some("5000")),
    ("5200", "Salaries", AccountType::Expense, Some("5000")),
];

/// Looks up the already seeded parent of `code`.
fn resolve_parent(
    by_code: &HashMap<String, AccountId>,
    code: &str,
    parent_code: Option<&str>,
) -> anyhow::Result<Option<AccountId>> {
    parent_code
        .map(|p| {
            by_code
                .get(p)
                .copied()
                .with_context(|| format!("Parent {p} of account {code} has not been seeded"))
        })
        .transpose()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let db = connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    let chart = ChartOfAccounts::new(Arc::new(SeaOrmLedgerStore::new(db)));

    let mut by_code: HashMap<String, AccountId> = chart
        .list_accounts()
        .await?
        .into_iter()
        .map(|s| (s.account.account_code, s.account.id))
        .collect();

    let mut created = 0;
    for (code, name, account_type, parent_code) in STARTER_CHART {
        if by_code.contains_key(*code) {
            continue;
        }
        let parent_id = resolve_parent(&by_code, code, *parent_code)?;
        let input = NewAccount {
            account_code: (*code).to_string(),
            account_name: (*name).to_string(),
            account_type: *account_type,
            description: None,
            parent_id,
        };

        match chart.create_account(input).await {
            Ok(id) => {
                by_code.insert((*code).to_string(), id);
                created += 1;
            }
            Err(LedgerError::DuplicateCode(_)) => {
                warn!(code, "Account created concurrently, reusing it");
                let existing = chart
                    .list_accounts()
                    .await?
                    .into_iter()
                    .find(|s| s.account.account_code == *code)
                    .with_context(|| format!("Account {code} vanished after a duplicate"))?;
                by_code.insert((*code).to_string(), existing.account.id);
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to seed account {code}")),
        }
    }

    info!(created, total = by_code.len(), "Seeding complete");
    Ok(())
}
