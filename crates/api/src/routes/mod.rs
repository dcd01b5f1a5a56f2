//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod health;
pub mod journal_entries;
pub mod reports;

/// Creates the API router with all routes.
///
/// Accounting routes require a caller identity; health is public.
pub fn api_routes() -> Router<AppState> {
    let accounting = Router::new()
        .merge(accounts::routes())
        .merge(journal_entries::routes())
        .merge(reports::routes());

    Router::new()
        .merge(health::routes())
        .nest("/accounting", accounting)
}
