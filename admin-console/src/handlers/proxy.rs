use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::Response,
};
use console_core::error::AppError;
use console_core::observability::{extract_request_id, inject_trace_headers};
use serde_json::Value;

use super::api_response;
use crate::api::{RequestConfig, RequestDescriptor};
use crate::AppState;

/// Forward `/api/<path>` to the platform API as the signed-in admin.
///
/// Method, query string and JSON body pass through unchanged.
pub async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    Path(path): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let mut config = RequestConfig::new();
    for (key, value) in query {
        config = config.query(key, value);
    }
    inject_trace_headers(
        &mut config.headers,
        extract_request_id(&headers).as_deref(),
    );

    let mut request = RequestDescriptor::new(method, format!("/{}", path)).with_config(config);
    if !body.iter().all(u8::is_ascii_whitespace) {
        let json: Value = serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Body is not valid JSON: {}", e)))?;
        request = request.json(json);
    }

    let result = state.client.send(request).await;
    let status = result
        .as_ref()
        .map(|reply| reply.status)
        .unwrap_or(StatusCode::OK);
    Ok(api_response(
        result.map(|reply| reply.body),
        status,
        &state.login_route,
    ))
}
