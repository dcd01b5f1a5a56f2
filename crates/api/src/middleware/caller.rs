//! Caller identity extraction.
//!
//! Authentication happens upstream; the gateway forwards the verified user
//! ID in the `x-user-id` header.

use axum::{extract::FromRequestParts, http::request::Parts};
use tally_shared::types::UserId;

use crate::error::ApiError;

/// Header carrying the authenticated caller's user ID.
pub const CALLER_HEADER: &str = "x-user-id";

/// Extractor for the authenticated caller.
///
/// ```ignore
/// async fn handler(caller: Caller) -> impl IntoResponse {
///     let user_id = caller.user_id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub UserId);

impl Caller {
    /// Returns the caller's user ID.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.0
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(CALLER_HEADER) else {
            return Err(ApiError::unauthorized("Authentication required"));
        };
        raw.to_str()
            .ok()
            .and_then(|value| value.trim().parse::<UserId>().ok())
            .map(Caller)
            .ok_or_else(|| ApiError::unauthorized("Invalid caller identity"))
    }
}
