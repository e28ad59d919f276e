use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::endpoints::{ADMIN_AUTH_SEND_OTP, ADMIN_AUTH_VERIFY_OTP};
use crate::api::{ApiClient, ApiError, ApiResult, RequestConfig};
use crate::session::{AdminIdentity, LoginResponse, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequest {
    pub phone: String,
    pub college_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerification {
    pub phone: String,
    pub college_id: String,
    pub otp: String,
}

/// Reply to an OTP request. Development backends echo the code back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtpDispatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

/// Admin sign-in via phone + college OTP, and sign-out.
#[derive(Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn send_otp(&self, request: &OtpRequest) -> ApiResult<OtpDispatch> {
        self.client
            .post(ADMIN_AUTH_SEND_OTP, request, RequestConfig::new())
            .await
    }

    /// Verify the OTP and start the session from the returned tokens.
    pub async fn verify_otp(&self, verification: &OtpVerification) -> ApiResult<AdminIdentity> {
        let login: LoginResponse = self
            .client
            .post(ADMIN_AUTH_VERIFY_OTP, verification, RequestConfig::new())
            .await?;

        self.client.session().begin(login).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to persist admin session");
            ApiError::session_storage(e)
        })
    }

    /// End the session locally. Succeeds when there is no session.
    pub async fn logout(&self) -> Result<(), StorageError> {
        self.client.session().destroy().await
    }

    pub async fn current_admin(&self) -> Option<AdminIdentity> {
        self.client.session().identity().await
    }
}
