//! Read side of the PostgreSQL ledger store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, Statement, TransactionTrait,
};
use tally_core::chart::{Account, AccountSummary, HierarchyNode, MAX_HIERARCHY_DEPTH};
use tally_core::ledger::{JournalDetailView, JournalEntry, JournalFilter, LineTotals};
use tally_core::store::{LedgerStore, StoreError, UnitOfWork};
use tally_shared::types::{AccountId, JournalEntryId};
use tracing::debug;
use uuid::Uuid;

use super::convert::{self, parse_account_type, store_error};
use super::unit_of_work::SeaOrmUnitOfWork;
use crate::entities::{chart_of_accounts, journal_details, journal_entries, sea_orm_active_enums};

const ACCOUNT_SUMMARY_SQL: &str = r"
SELECT a.id, a.account_code, a.account_name, a.account_type::text AS account_type,
       a.description, a.parent_id,
       p.account_name AS parent_name,
       (SELECT COUNT(*) FROM chart_of_accounts c WHERE c.parent_id = a.id) AS child_count
FROM chart_of_accounts a
LEFT JOIN chart_of_accounts p ON p.id = a.parent_id
";

// Rows reachable only through a parent cycle never join a root path.
const HIERARCHY_SQL: &str = r"
WITH RECURSIVE tree AS (
    SELECT id, account_code, account_name, account_type, description, parent_id,
           0 AS level,
           ARRAY[account_code::text] AS sort_path,
           ARRAY[id] AS visited
    FROM chart_of_accounts
    WHERE parent_id IS NULL
  UNION ALL
    SELECT c.id, c.account_code, c.account_name, c.account_type, c.description, c.parent_id,
           t.level + 1,
           t.sort_path || c.account_code::text,
           t.visited || c.id
    FROM chart_of_accounts c
    JOIN tree t ON c.parent_id = t.id
    WHERE NOT c.id = ANY(t.visited) AND t.level < $1
)
SELECT id, account_code, account_name, account_type::text AS account_type,
       description, parent_id, level
FROM tree
ORDER BY sort_path
";

const POSTED_TOTALS_SQL: &str = r"
SELECT d.account_id,
       COALESCE(SUM(d.debit), 0) AS total_debit,
       COALESCE(SUM(d.credit), 0) AS total_credit
FROM journal_details d
JOIN journal_entries j ON j.id = d.journal_id
WHERE j.status = 'posted' AND j.entry_date <= $1
GROUP BY d.account_id
";

#[derive(Debug, FromQueryResult)]
struct AccountSummaryRow {
    id: Uuid,
    account_code: String,
    account_name: String,
    account_type: String,
    description: Option<String>,
    parent_id: Option<Uuid>,
    parent_name: Option<String>,
    child_count: i64,
}

impl AccountSummaryRow {
    fn into_summary(self) -> Result<AccountSummary, StoreError> {
        Ok(AccountSummary {
            account: Account {
                id: AccountId::from_uuid(self.id),
                account_code: self.account_code,
                account_name: self.account_name,
                account_type: parse_account_type(&self.account_type)?,
                description: self.description,
                parent_id: self.parent_id.map(AccountId::from_uuid),
            },
            parent_name: self.parent_name,
            child_count: u64::try_from(self.child_count).unwrap_or_default(),
        })
    }
}

#[derive(Debug, FromQueryResult)]
struct HierarchyRow {
    id: Uuid,
    account_code: String,
    account_name: String,
    account_type: String,
    description: Option<String>,
    parent_id: Option<Uuid>,
    level: i32,
}

#[derive(Debug, FromQueryResult)]
struct TotalsRow {
    account_id: Uuid,
    total_debit: Decimal,
    total_credit: Decimal,
}

/// [`LedgerStore`] over a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct SeaOrmLedgerStore {
    db: DatabaseConnection,
}

impl SeaOrmLedgerStore {
    /// Creates a store over an existing connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn summaries(
        &self,
        filter: &str,
        values: Vec<sea_orm::Value>,
    ) -> Result<Vec<AccountSummary>, StoreError> {
        let sql = format!("{ACCOUNT_SUMMARY_SQL} {filter}");
        AccountSummaryRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            values,
        ))
        .all(&self.db)
        .await
        .map_err(store_error)?
        .into_iter()
        .map(AccountSummaryRow::into_summary)
        .collect()
    }
}

#[async_trait]
impl LedgerStore for SeaOrmLedgerStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;
        Ok(Box::new(SeaOrmUnitOfWork::new(txn)))
    }

    async fn list_accounts(&self) -> Result<Vec<AccountSummary>, StoreError> {
        self.summaries("ORDER BY a.account_code", vec![]).await
    }

    async fn find_account(&self, id: AccountId) -> Result<Option<AccountSummary>, StoreError> {
        let mut rows = self
            .summaries("WHERE a.id = $1", vec![id.into_inner().into()])
            .await?;
        Ok(rows.pop())
    }

    async fn list_journal_entries(
        &self,
        filter: &JournalFilter,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        let mut query = journal_entries::Entity::find();
        if let Some(start) = filter.start_date {
            query = query.filter(journal_entries::Column::EntryDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(journal_entries::Column::EntryDate.lte(end));
        }
        if let Some(status) = filter.status {
            query = query.filter(
                journal_entries::Column::Status.eq(sea_orm_active_enums::JournalStatus::from(status)),
            );
        }

        let models = query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?;
        Ok(models.into_iter().map(convert::journal_entry).collect())
    }

    async fn list_journal_details(
        &self,
        journal_ids: &[JournalEntryId],
    ) -> Result<Vec<JournalDetailView>, StoreError> {
        let ids: Vec<Uuid> = journal_ids.iter().map(|id| id.into_inner()).collect();
        let rows = journal_details::Entity::find()
            .filter(journal_details::Column::JournalId.is_in(ids))
            .find_also_related(chart_of_accounts::Entity)
            .order_by_asc(journal_details::Column::JournalId)
            .order_by_asc(journal_details::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(|(detail, account)| {
                let (account_code, account_name) = account
                    .map(|a| (a.account_code, a.account_name))
                    .unwrap_or_default();
                JournalDetailView {
                    detail: convert::journal_detail(detail),
                    account_code,
                    account_name,
                }
            })
            .collect())
    }

    async fn account_hierarchy(&self) -> Result<Vec<HierarchyNode>, StoreError> {
        let depth = i32::try_from(MAX_HIERARCHY_DEPTH).unwrap_or(i32::MAX);
        let rows = HierarchyRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            HIERARCHY_SQL,
            [depth.into()],
        ))
        .all(&self.db)
        .await
        .map_err(store_error)?;
        debug!(accounts = rows.len(), "Loaded account hierarchy");

        rows.into_iter()
            .map(|row| {
                Ok(HierarchyNode {
                    account: Account {
                        id: AccountId::from_uuid(row.id),
                        account_code: row.account_code,
                        account_name: row.account_name,
                        account_type: parse_account_type(&row.account_type)?,
                        description: row.description,
                        parent_id: row.parent_id.map(AccountId::from_uuid),
                    },
                    level: u32::try_from(row.level).unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn posted_totals(
        &self,
        as_of: NaiveDate,
    ) -> Result<HashMap<AccountId, LineTotals>, StoreError> {
        let rows = TotalsRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            POSTED_TOTALS_SQL,
            [as_of.into()],
        ))
        .all(&self.db)
        .await
        .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    AccountId::from_uuid(row.account_id),
                    LineTotals::new(row.total_debit, row.total_credit),
                )
            })
            .collect())
    }
}
