//! Journal entry routes.

use axum::{Router, extract::State, response::Response, routing::get};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tally_core::ledger::{
    JournalDetailView, JournalEntryWithDetails, JournalFilter, JournalStatus, NewJournalDetail,
    NewJournalEntry,
};
use tally_shared::types::{AccountId, JournalDetailId, JournalEntryId, UserId};
use tracing::info;

use crate::{
    AppState,
    error::ApiError,
    extract::{ApiJson, ApiQuery},
    middleware::Caller,
    response,
};

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/journal-entries",
        get(list_journal_entries).post(create_journal_entry),
    )
}

/// Query parameters for listing journal entries.
#[derive(Debug, Default, Deserialize)]
pub struct ListJournalEntriesQuery {
    /// Earliest entry date (inclusive, YYYY-MM-DD).
    pub start_date: Option<NaiveDate>,
    /// Latest entry date (inclusive, YYYY-MM-DD).
    pub end_date: Option<NaiveDate>,
    /// Status filter: draft, posted, void.
    pub status: Option<String>,
}

/// One line of a journal entry request.
#[derive(Debug, Deserialize)]
pub struct JournalDetailRequest {
    /// Account to post to.
    pub account_id: AccountId,
    /// Debit amount (default 0).
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount (default 0).
    #[serde(default)]
    pub credit: Decimal,
    /// Line description.
    pub description: Option<String>,
}

/// Request body for creating a journal entry.
#[derive(Debug, Deserialize)]
pub struct CreateJournalEntryRequest {
    /// Accounting date (YYYY-MM-DD).
    pub entry_date: NaiveDate,
    /// External reference number.
    pub reference_no: Option<String>,
    /// Entry description.
    pub description: Option<String>,
    /// Status (default: posted).
    pub status: Option<String>,
    /// Detail lines.
    pub details: Vec<JournalDetailRequest>,
}

/// Response for a journal detail line.
#[derive(Debug, Serialize)]
pub struct JournalDetailResponse {
    /// Detail ID.
    pub id: JournalDetailId,
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line description.
    pub description: Option<String>,
}

/// Response for a journal entry.
#[derive(Debug, Serialize)]
pub struct JournalEntryResponse {
    /// Entry ID.
    pub id: JournalEntryId,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// External reference number.
    pub reference_no: Option<String>,
    /// Entry description.
    pub description: Option<String>,
    /// Recording user.
    pub created_by: UserId,
    /// Status.
    pub status: JournalStatus,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Detail lines.
    pub details: Vec<JournalDetailResponse>,
}

impl From<JournalDetailView> for JournalDetailResponse {
    fn from(view: JournalDetailView) -> Self {
        Self {
            id: view.detail.id,
            account_id: view.detail.account_id,
            account_code: view.account_code,
            account_name: view.account_name,
            debit: view.detail.debit,
            credit: view.detail.credit,
            description: view.detail.description,
        }
    }
}

impl From<JournalEntryWithDetails> for JournalEntryResponse {
    fn from(item: JournalEntryWithDetails) -> Self {
        let totals = item.totals();
        let entry = item.entry;
        Self {
            id: entry.id,
            entry_date: entry.entry_date,
            reference_no: entry.reference_no,
            description: entry.description,
            created_by: entry.created_by,
            status: entry.status,
            total_debit: totals.debit,
            total_credit: totals.credit,
            details: item.details.into_iter().map(Into::into).collect(),
        }
    }
}

fn parse_status(raw: &str) -> Result<JournalStatus, ApiError> {
    raw.parse::<JournalStatus>()
        .map_err(|e| ApiError::validation(e.to_string()))
}

/// GET `/accounting/journal-entries` - List entries with their detail lines.
async fn list_journal_entries(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListJournalEntriesQuery>,
) -> Result<Response, ApiError> {
    let filter = JournalFilter {
        start_date: query.start_date,
        end_date: query.end_date,
        status: query.status.as_deref().map(parse_status).transpose()?,
    };

    let entries = state
        .ledger
        .list_journal_entries(&filter)
        .await
        .map_err(|e| ApiError::ledger(&e, "Failed to retrieve journal entries"))?;

    let body: Vec<JournalEntryResponse> = entries.into_iter().map(Into::into).collect();
    Ok(response::ok(body))
}

/// POST `/accounting/journal-entries` - Create a balanced journal entry.
async fn create_journal_entry(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(payload): ApiJson<CreateJournalEntryRequest>,
) -> Result<Response, ApiError> {
    let status = payload
        .status
        .as_deref()
        .map(parse_status)
        .transpose()?
        .unwrap_or_default();
    let lines = payload.details.len();
    let input = NewJournalEntry {
        entry_date: payload.entry_date,
        reference_no: payload.reference_no,
        description: payload.description,
        created_by: caller.user_id(),
        status,
        details: payload
            .details
            .into_iter()
            .map(|d| NewJournalDetail {
                account_id: d.account_id,
                debit: d.debit,
                credit: d.credit,
                description: d.description,
            })
            .collect(),
    };

    let id = state
        .ledger
        .create_journal_entry(input)
        .await
        .map_err(|e| ApiError::ledger(&e, "Failed to create journal entry"))?;

    info!(
        journal_id = %id,
        lines,
        user_id = %caller.user_id(),
        "Journal entry created"
    );
    Ok(response::created(
        json!({ "id": id }),
        "Journal entry created successfully",
    ))
}
