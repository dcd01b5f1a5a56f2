//! Financial report routes.

use axum::{Router, extract::State, response::Response, routing::get};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{AppState, error::ApiError, extract::ApiQuery, response};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/balance-sheet", get(balance_sheet))
}

/// Query parameters for the balance sheet.
#[derive(Debug, Default, Deserialize)]
pub struct BalanceSheetQuery {
    /// Report date (YYYY-MM-DD). Defaults to today (UTC).
    pub as_of_date: Option<NaiveDate>,
}

/// GET `/accounting/reports/balance-sheet` - Balance sheet as of a date.
async fn balance_sheet(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BalanceSheetQuery>,
) -> Result<Response, ApiError> {
    let as_of = query
        .as_of_date
        .unwrap_or_else(|| Utc::now().date_naive());

    let report = state
        .ledger
        .generate_balance_sheet(as_of)
        .await
        .map_err(|e| ApiError::ledger(&e, "Failed to generate balance sheet"))?;

    Ok(response::ok(report))
}
