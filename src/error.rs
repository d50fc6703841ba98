use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::storage::StorageError;

/// Issue
///
/// One violated constraint on one submitted field. `path` names the field (empty for
/// payload-level problems such as an update that touches nothing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub code: String,
    pub path: Vec<String>,
    pub message: String,
}

impl Issue {
    pub fn new(code: impl Into<String>, path: &[&str], message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            path: path.iter().map(|segment| segment.to_string()).collect(),
            message: message.into(),
        }
    }
}

/// ApiError
///
/// Every failure a handler can surface. Each variant maps to exactly one status code in
/// the `IntoResponse` impl below, so handlers only ever propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed with {} issue(s)", .0.len())]
    Validation(Vec<Issue>),

    #[error("No updates provided")]
    NoUpdates,

    #[error("Not Found")]
    NotFound,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Email/Password does not match")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Shorthand for a validation failure carrying a single issue.
    pub fn invalid(code: &str, path: &[&str], message: impl Into<String>) -> Self {
        Self::Validation(vec![Issue::new(code, path, message)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::NoUpdates => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AccountDisabled | Self::InvalidCredentials | Self::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            Self::Database(_) | Self::Storage(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn validation_body(issues: &[Issue]) -> serde_json::Value {
    json!({
        "success": false,
        "error": {
            "name": "ValidationError",
            "issues": issues,
        }
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(issues) => validation_body(issues),
            Self::NoUpdates => validation_body(&[Issue::new(
                "invalid_updates",
                &[],
                "No updates provided",
            )]),
            Self::Database(_) | Self::Storage(_) | Self::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                json!({ "message": "Internal Server Error" })
            }
            other => json!({ "message": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
