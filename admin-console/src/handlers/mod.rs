pub mod app;
pub mod auth;
pub mod proxy;
pub mod resources;

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::api::{ApiError, ApiResponse, ApiResult, ErrorKind};

pub const HX_REDIRECT: &str = "HX-Redirect";

/// HTTP status reported to the console UI for a failed platform call.
pub fn error_status(err: &ApiError) -> StatusCode {
    match err.kind {
        ErrorKind::ServerRejected | ErrorKind::AuthExpired => {
            StatusCode::from_u16(err.status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        ErrorKind::NoResponse => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::RequestSetupFailed | ErrorKind::InvalidBody => StatusCode::BAD_GATEWAY,
        ErrorKind::SessionInvalid => StatusCode::UNAUTHORIZED,
        ErrorKind::SessionStorage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn hx_redirect(route: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(route) {
        Ok(value) => {
            headers.insert(HX_REDIRECT, value);
        }
        Err(e) => tracing::error!(route, error = %e, "Invalid redirect route"),
    }
    headers
}

/// Render a call outcome as `{ data, error }` with the mapped status.
///
/// A torn-down session also sends the UI to the login route.
pub fn api_response<T: Serialize>(
    result: ApiResult<T>,
    success: StatusCode,
    login_route: &str,
) -> Response {
    match result {
        Ok(data) => (success, Json(ApiResponse::from(Ok::<T, ApiError>(data)))).into_response(),
        Err(err) => {
            let status = error_status(&err);
            let headers = if err.is_session_invalid() {
                hx_redirect(login_route)
            } else {
                HeaderMap::new()
            };
            (status, headers, Json(ApiResponse::<T>::from(Err(err)))).into_response()
        }
    }
}
