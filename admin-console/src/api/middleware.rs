//! Narrow stages composed around the base HTTP call: URL resolution,
//! authorization injection and outcome classification.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use super::error::{ApiError, ApiResult, Reply};

/// Join a call path onto the base URL. Absolute URLs pass through unchanged.
pub fn resolve_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// `Bearer <token>` header value, marked sensitive.
pub fn bearer_value(token: &SecretString) -> Option<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())).ok()?;
    value.set_sensitive(true);
    Some(value)
}

/// Attach the session's access token. Without a token the headers are left as given.
pub fn apply_authorization(headers: &mut HeaderMap, access_token: Option<&SecretString>) {
    if let Some(value) = access_token.and_then(bearer_value) {
        headers.insert(AUTHORIZATION, value);
    }
}

/// Parse a response body the way callers expect to see it: empty is
/// `null`, JSON is parsed, anything else is kept as a string.
pub fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Classify a transport-level failure.
///
/// Only errors raised while building the request count as setup failures;
/// anything after the request was handed to the transport is "no response".
pub fn classify_transport_error(err: &reqwest::Error) -> ApiError {
    if err.is_builder() {
        ApiError::request_setup(err.to_string())
    } else {
        ApiError::no_response()
    }
}

/// Turn the raw outcome of a send into a `Reply` or an `ApiError`.
pub async fn classify(outcome: Result<Response, reqwest::Error>) -> ApiResult<Reply> {
    let response = outcome.map_err(|e| classify_transport_error(&e))?;
    let status = response.status();
    let bytes = response.bytes().await.map_err(|e| {
        tracing::warn!(status = %status, error = %e, "Failed to read response body");
        ApiError::no_response()
    })?;

    classify_parts(status, &bytes)
}

/// Status-and-body half of [`classify`].
pub fn classify_parts(status: StatusCode, bytes: &[u8]) -> ApiResult<Reply> {
    let body = parse_body(bytes);
    if status.is_success() {
        Ok(Reply { status, body })
    } else {
        Err(ApiError::from_response(status, body))
    }
}
