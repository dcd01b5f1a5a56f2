//! Chart-of-accounts routes.

use axum::{Router, extract::State, response::Response, routing::get};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tally_core::chart::{AccountPatch, AccountSummary, AccountType, NewAccount};
use tally_shared::types::AccountId;
use tracing::info;

use crate::{
    AppState,
    error::ApiError,
    extract::{ApiJson, ApiPath},
    middleware::Caller,
    response,
};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/{id}", get(get_account).put(update_account))
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Unique account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Account type: asset, liability, equity, revenue, expense.
    pub account_type: String,
    /// Account description.
    pub description: Option<String>,
    /// Parent account ID for hierarchical structure.
    pub parent_id: Option<AccountId>,
}

/// Request body for updating an account.
///
/// Absent fields are left unchanged; an explicit `null` clears
/// `description` or `parent_id`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    /// Account name.
    pub account_name: Option<String>,
    /// Account type.
    pub account_type: Option<String>,
    /// Account description.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    /// Parent account ID.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub parent_id: Option<Option<AccountId>>,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: AccountId,
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Account description.
    pub description: Option<String>,
    /// Parent account ID.
    pub parent_id: Option<AccountId>,
    /// Parent account name.
    pub parent_account_name: Option<String>,
    /// Whether any account names this one as parent.
    pub has_children: bool,
}

impl From<AccountSummary> for AccountResponse {
    fn from(summary: AccountSummary) -> Self {
        let has_children = summary.has_children();
        let account = summary.account;
        Self {
            id: account.id,
            account_code: account.account_code,
            account_name: account.account_name,
            account_type: account.account_type,
            description: account.description,
            parent_id: account.parent_id,
            parent_account_name: summary.parent_name,
            has_children,
        }
    }
}

fn parse_account_type(raw: &str) -> Result<AccountType, ApiError> {
    raw.parse::<AccountType>()
        .map_err(|e| ApiError::validation(e.to_string()))
}

/// GET `/accounting/accounts` - List the chart of accounts.
async fn list_accounts(State(state): State<AppState>) -> Result<Response, ApiError> {
    let accounts = state
        .chart
        .list_accounts()
        .await
        .map_err(|e| ApiError::ledger(&e, "Failed to retrieve chart of accounts"))?;

    let body: Vec<AccountResponse> = accounts.into_iter().map(AccountResponse::from).collect();
    Ok(response::ok(body))
}

/// GET `/accounting/accounts/{id}` - Fetch one account.
async fn get_account(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AccountId>,
) -> Result<Response, ApiError> {
    let account = state
        .chart
        .get_account(id)
        .await
        .map_err(|e| ApiError::ledger(&e, "Failed to retrieve account"))?;

    Ok(response::ok(AccountResponse::from(account)))
}

/// POST `/accounting/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(payload): ApiJson<CreateAccountRequest>,
) -> Result<Response, ApiError> {
    let input = NewAccount {
        account_type: parse_account_type(&payload.account_type)?,
        account_code: payload.account_code,
        account_name: payload.account_name,
        description: payload.description,
        parent_id: payload.parent_id,
    };
    let code = input.account_code.clone();

    let id = state
        .chart
        .create_account(input)
        .await
        .map_err(|e| ApiError::ledger(&e, "Failed to create account"))?;

    info!(account_id = %id, code = %code, user_id = %caller.user_id(), "Account created");
    Ok(response::created(json!({ "id": id }), "Account created successfully"))
}

/// PUT `/accounting/accounts/{id}` - Partially update an account.
async fn update_account(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<AccountId>,
    ApiJson(payload): ApiJson<UpdateAccountRequest>,
) -> Result<Response, ApiError> {
    let patch = AccountPatch {
        account_name: payload.account_name,
        account_type: payload
            .account_type
            .as_deref()
            .map(parse_account_type)
            .transpose()?,
        description: payload.description,
        parent_id: payload.parent_id,
    };

    state
        .chart
        .update_account(id, patch)
        .await
        .map_err(|e| ApiError::ledger(&e, "Failed to update account"))?;
    let summary = state
        .chart
        .get_account(id)
        .await
        .map_err(|e| ApiError::ledger(&e, "Failed to update account"))?;

    info!(account_id = %id, user_id = %caller.user_id(), "Account updated");
    Ok(response::ok_with_message(
        AccountResponse::from(summary),
        "Account updated successfully",
    ))
}
