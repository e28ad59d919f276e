use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";
pub const NO_RESPONSE_MESSAGE: &str = "No response from server";
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed";

/// Outcome of every API client call. Failures are values, never panics.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The server answered with a non-2xx status.
    ServerRejected,
    /// The server answered 401; the access token may be refreshed.
    AuthExpired,
    /// The request was sent but nothing came back (connect failure, timeout).
    NoResponse,
    /// The request could not be built or handed to the transport.
    RequestSetupFailed,
    /// The refresh exchange failed and the session was torn down.
    SessionInvalid,
    /// A 2xx body did not match the expected shape.
    InvalidBody,
    /// The session could not be written to storage.
    SessionStorage,
}

#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    /// HTTP status of the response, `0` when no response was received.
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ApiError {
    /// Error for a response received with a non-2xx status.
    pub fn from_response(status: StatusCode, body: Value) -> Self {
        let kind = if status == StatusCode::UNAUTHORIZED {
            ErrorKind::AuthExpired
        } else {
            ErrorKind::ServerRejected
        };

        Self {
            kind,
            message: server_message(&body).unwrap_or(DEFAULT_ERROR_MESSAGE).to_string(),
            status: status.as_u16(),
            body: Some(body),
        }
    }

    pub fn no_response() -> Self {
        Self {
            kind: ErrorKind::NoResponse,
            message: NO_RESPONSE_MESSAGE.to_string(),
            status: 0,
            body: None,
        }
    }

    pub fn request_setup(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            kind: ErrorKind::RequestSetupFailed,
            message: if detail.is_empty() {
                REQUEST_FAILED_MESSAGE.to_string()
            } else {
                detail
            },
            status: 0,
            body: None,
        }
    }

    pub fn invalid_body(status: StatusCode, detail: impl std::fmt::Display, body: Value) -> Self {
        Self {
            kind: ErrorKind::InvalidBody,
            message: format!("Unexpected response body: {}", detail),
            status: status.as_u16(),
            body: Some(body),
        }
    }

    /// Wrap the failure of a refresh exchange. The cause's details are kept.
    pub fn session_invalid(cause: ApiError) -> Self {
        Self {
            kind: ErrorKind::SessionInvalid,
            ..cause
        }
    }

    pub fn session_storage(detail: impl std::fmt::Display) -> Self {
        Self {
            kind: ErrorKind::SessionStorage,
            message: format!("Failed to store session: {}", detail),
            status: 0,
            body: None,
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        self.kind == ErrorKind::AuthExpired
    }

    pub fn is_forbidden(&self) -> bool {
        self.status == StatusCode::FORBIDDEN.as_u16()
    }

    pub fn is_no_response(&self) -> bool {
        self.kind == ErrorKind::NoResponse
    }

    pub fn is_session_invalid(&self) -> bool {
        self.kind == ErrorKind::SessionInvalid
    }
}

fn server_message(body: &Value) -> Option<&str> {
    body.get("message")
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .filter(|message| !message.is_empty())
}

/// A successful raw reply: the status and the parsed body.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    pub fn decode<T: serde::de::DeserializeOwned>(self) -> ApiResult<T> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| ApiError::invalid_body(self.status, e, self.body))
    }
}

/// Wire form of a call outcome: exactly one of `data` and `error` is set.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> From<ApiResult<T>> for ApiResponse<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(data) => Self {
                data: Some(data),
                error: None,
            },
            Err(error) => Self {
                data: None,
                error: Some(error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn uses_server_message_when_present() {
        let err = ApiError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "message": "Invalid status transition" }),
        );
        assert_eq!(err.kind, ErrorKind::ServerRejected);
        assert_eq!(err.message, "Invalid status transition");
        assert_eq!(err.status, 422);
    }

    #[test]
    fn falls_back_to_error_field_then_default() {
        let err = ApiError::from_response(StatusCode::BAD_REQUEST, json!({ "error": "bad id" }));
        assert_eq!(err.message, "bad id");

        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, json!("boom"));
        assert_eq!(err.message, DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn unauthorized_is_auth_expired_but_forbidden_is_not() {
        assert!(ApiError::from_response(StatusCode::UNAUTHORIZED, Value::Null).is_auth_expired());

        let forbidden = ApiError::from_response(StatusCode::FORBIDDEN, Value::Null);
        assert!(!forbidden.is_auth_expired());
        assert!(forbidden.is_forbidden());
    }

    #[test]
    fn session_invalid_keeps_refresh_failure_details() {
        let cause = ApiError::from_response(
            StatusCode::UNAUTHORIZED,
            json!({ "message": "Refresh token revoked" }),
        );
        let err = ApiError::session_invalid(cause);
        assert_eq!(err.kind, ErrorKind::SessionInvalid);
        assert_eq!(err.status, 401);
        assert_eq!(err.message, "Refresh token revoked");
    }

    #[test]
    fn response_envelope_has_exactly_one_side() {
        let ok: ApiResponse<u32> = Ok(7).into();
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "data": 7, "error": null })
        );

        let failed: ApiResponse<u32> = Err(ApiError::no_response()).into();
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({
                "data": null,
                "error": { "kind": "no_response", "message": NO_RESPONSE_MESSAGE, "status": 0 }
            })
        );
    }

    #[test]
    fn decode_reports_invalid_body() {
        let reply = Reply {
            status: StatusCode::OK,
            body: json!({ "count": "many" }),
        };

        #[derive(Debug, serde::Deserialize)]
        struct Count {
            #[allow(dead_code)]
            count: u32,
        }

        let err = reply.decode::<Count>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidBody);
        assert_eq!(err.status, 200);
        assert_eq!(err.body, Some(json!({ "count": "many" })));
    }
}
