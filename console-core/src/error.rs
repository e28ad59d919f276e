use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failures of the console's own routes.
///
/// Platform API failures travel inside the `{ data, error }` envelope and
/// never become an `AppError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {0}")]
    BadRequest(anyhow::Error),

    #[error("not signed in: {0}")]
    Unauthorized(anyhow::Error),

    #[error("no such resource: {0}")]
    NotFound(anyhow::Error),

    #[error(transparent)]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show the caller. Internal causes stay in the logs.
    fn public_message(&self) -> String {
        match self {
            Self::InternalError(_) => "internal error".to_owned(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::InternalError(cause) = &self {
            tracing::error!(error = %cause, "Request failed");
        }
        let body = json!({ "error": self.public_message() });
        (self.status_code(), Json(body)).into_response()
    }
}
