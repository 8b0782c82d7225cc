//! Handler error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use casetrack_core::{CoreError, Problem};

/// Wraps [`CoreError`] so handlers can use `?` and still produce
/// problem-format bodies.
///
/// Validation and not-found errors carry their detail; anything else
/// renders as an opaque 500 (the panic-recovery layer handles detail
/// exposure for development mode).
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub CoreError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let problem = match &self.0 {
            CoreError::Validation { message } => Problem::validation(message.clone()),
            CoreError::NotFound { .. } => Problem::not_found(self.0.to_string()),
            _ => {
                tracing::error!(error = %self.0, "Handler failed");
                Problem::unexpected()
            }
        };

        (status, Json(problem)).into_response()
    }
}
