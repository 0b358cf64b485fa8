use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
///
/// Every variant is converted into the uniform `{success: false, ...}` JSON
/// body at the handler boundary.
#[derive(Debug, Clone)]
pub enum AppError {
    /// A required request parameter is missing (caller-fixable).
    MissingParameter(String),
    /// A required piece of server configuration is missing (operator-fixable).
    MissingConfiguration(String),
    /// The CRM has no record for the requested identifier.
    NotFound(String),
    /// The CRM call failed: network error, non-2xx status or unreadable body.
    UpstreamFailure(String),
    /// Internal server error.
    Internal(String),
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingParameter(msg) => write!(f, "Missing parameter: {}", msg),
            AppError::MissingConfiguration(msg) => write!(f, "Missing configuration: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::UpstreamFailure(msg) => write!(f, "Upstream failure: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MissingConfiguration(_)
            | AppError::UpstreamFailure(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Caller-facing errors carry their message as-is. Upstream and internal
    /// failures answer with a generic `"Server error"` message and put the
    /// underlying description under `error` for diagnostics.
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::MissingParameter(msg) => {
                tracing::info!("Rejected request: {}", msg);
                json!({ "success": false, "message": msg })
            }
            AppError::NotFound(msg) => {
                tracing::info!("{}", msg);
                json!({ "success": false, "message": msg })
            }
            AppError::MissingConfiguration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                json!({ "success": false, "message": msg })
            }
            AppError::UpstreamFailure(msg) | AppError::Internal(msg) => {
                tracing::error!("Detailed error: {}", self);
                json!({
                    "success": false,
                    "message": "Server error",
                    "error": msg,
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an `AppError`.
    fn from(err: reqwest::Error) -> Self {
        AppError::UpstreamFailure(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Internal(format!("Invalid URL: {}", err))
    }
}
