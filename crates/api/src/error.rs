//! Transport-level error mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tally_core::LedgerError;
use tally_shared::AppError;
use tracing::error;

/// An error ready to be rendered as a failure envelope.
///
/// Server-side failures are logged and replaced by the operation's fixed
/// message; everything else shows the caller its own message.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    code: &'static str,
    context: &'static str,
}

impl ApiError {
    /// Wraps a ledger failure raised while performing `context`.
    #[must_use]
    pub fn ledger(err: &LedgerError, context: &'static str) -> Self {
        let code = err.error_code();
        let message = err.to_string();
        let error = match err {
            LedgerError::AccountNotFound(_) | LedgerError::ParentNotFound(_) => {
                AppError::NotFound(message)
            }
            LedgerError::DuplicateCode(_) => AppError::Conflict(message),
            LedgerError::Store(_) | LedgerError::RollbackFailed { .. } => {
                AppError::Database(message)
            }
            _ => AppError::Validation(message),
        };
        Self {
            error,
            code,
            context,
        }
    }

    /// A malformed request field.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::from(AppError::Validation(message.into()))
    }

    /// Missing or malformed caller identity.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::from(AppError::Unauthorized(message.into()))
    }

    /// Returns the HTTP status this error renders with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self {
            code: error.error_code(),
            error,
            context: "Request failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.error.is_server_error() {
            error!(error = %self.error, "{}", self.context);
            self.context.to_string()
        } else {
            self.error.public_message()
        };

        (
            status,
            Json(json!({
                "success": false,
                "error": self.code,
                "message": message,
            })),
        )
            .into_response()
    }
}
