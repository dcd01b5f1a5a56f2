//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for the chart of accounts, journal entries and reports
//! - Caller identity extraction
//! - Response envelope and error mapping, including extractor rejections

pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tally_core::{ChartOfAccounts, LedgerEngine, LedgerStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Chart-of-accounts service.
    pub chart: ChartOfAccounts,
    /// Ledger engine.
    pub ledger: LedgerEngine,
}

impl AppState {
    /// Builds the services over one shared store.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            chart: ChartOfAccounts::new(Arc::clone(&store)),
            ledger: LedgerEngine::new(store),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
