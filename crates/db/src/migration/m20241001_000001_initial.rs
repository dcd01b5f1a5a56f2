//! Initial database migration.
//!
//! Creates the ledger enums, the chart of accounts and the journal tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(CHART_OF_ACCOUNTS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_DETAILS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE account_type AS ENUM ('asset', 'liability', 'equity', 'revenue', 'expense');
CREATE TYPE journal_status AS ENUM ('draft', 'posted', 'void');
";

const CHART_OF_ACCOUNTS_SQL: &str = r"
CREATE TABLE chart_of_accounts (
    id              UUID PRIMARY KEY,
    account_code    VARCHAR(20) NOT NULL,
    account_name    VARCHAR(255) NOT NULL,
    account_type    account_type NOT NULL,
    description     TEXT,
    parent_id       UUID REFERENCES chart_of_accounts(id) ON DELETE RESTRICT,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chart_of_accounts_account_code_key UNIQUE (account_code),
    CONSTRAINT chk_account_not_own_parent CHECK (parent_id IS NULL OR parent_id <> id)
);

CREATE INDEX idx_chart_of_accounts_parent ON chart_of_accounts(parent_id);
CREATE INDEX idx_chart_of_accounts_type ON chart_of_accounts(account_type);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id              UUID PRIMARY KEY,
    entry_date      DATE NOT NULL,
    reference_no    VARCHAR(100),
    description     TEXT,
    created_by      UUID NOT NULL,
    status          journal_status NOT NULL DEFAULT 'posted',
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_journal_entries_date ON journal_entries(entry_date DESC, id DESC);
CREATE INDEX idx_journal_entries_status ON journal_entries(status, entry_date);
";

const JOURNAL_DETAILS_SQL: &str = r"
CREATE TABLE journal_details (
    id              UUID PRIMARY KEY,
    journal_id      UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id      UUID NOT NULL REFERENCES chart_of_accounts(id) ON DELETE RESTRICT,
    debit           NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit          NUMERIC(19, 4) NOT NULL DEFAULT 0,
    description     TEXT,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_journal_details_non_negative CHECK (debit >= 0 AND credit >= 0)
);

CREATE INDEX idx_journal_details_journal ON journal_details(journal_id);
CREATE INDEX idx_journal_details_account ON journal_details(account_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS journal_details;
DROP TABLE IF EXISTS journal_entries;
DROP TABLE IF EXISTS chart_of_accounts;
DROP TYPE IF EXISTS journal_status;
DROP TYPE IF EXISTS account_type;
";
