pub mod health;
pub mod metrics;
pub mod predict;
pub mod recommend;
pub mod search;
pub mod session;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::HearthError;

/// Wrapper that converts `HearthError` into an HTTP response.
pub struct ApiError(pub HearthError);

impl From<HearthError> for ApiError {
    fn from(e: HearthError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status >= 500 {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = json!({
            "error": self.0.to_string(),
            "status": status,
        });
        (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            axum::Json(body),
        )
            .into_response()
    }
}

/// Resolve an optional `top_n` against the configured default and ceiling.
pub(crate) fn resolve_top_n(
    requested: Option<usize>,
    default_top_n: usize,
    max_top_n: usize,
) -> Result<usize, ApiError> {
    let top_n = requested.unwrap_or(default_top_n);
    if top_n > max_top_n {
        return Err(ApiError(HearthError::InvalidArgument(format!(
            "top_n {top_n} exceeds maximum of {max_top_n}"
        ))));
    }
    Ok(top_n)
}
