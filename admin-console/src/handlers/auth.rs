use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use console_core::error::AppError;

use super::{api_response, hx_redirect};
use crate::services::{OtpRequest, OtpVerification};
use crate::AppState;

pub async fn send_otp_handler(
    State(state): State<AppState>,
    Json(payload): Json<OtpRequest>,
) -> Response {
    let result = state.auth.send_otp(&payload).await;
    api_response(result, StatusCode::OK, &state.login_route)
}

pub async fn verify_otp_handler(
    State(state): State<AppState>,
    Json(payload): Json<OtpVerification>,
) -> Response {
    match state.auth.verify_otp(&payload).await {
        Ok(admin) => {
            tracing::info!(admin_id = ?admin.id, "Admin logged in successfully");
            (hx_redirect("/"), api_response(Ok(admin), StatusCode::OK, &state.login_route))
                .into_response()
        }
        Err(err) => {
            tracing::warn!(status = err.status, message = %err.message, "OTP verification failed");
            api_response::<()>(Err(err), StatusCode::OK, &state.login_route)
        }
    }
}

pub async fn logout_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    state.auth.logout().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to clear session on logout");
        AppError::InternalError(anyhow::anyhow!("Failed to clear session: {}", e))
    })?;

    tracing::info!("Admin logged out");
    Ok((StatusCode::OK, hx_redirect(&state.login_route), "").into_response())
}

pub async fn me_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    match state.auth.current_admin().await {
        Some(admin) => Ok(Json(admin).into_response()),
        None => Err(AppError::Unauthorized(anyhow::anyhow!("No active session"))),
    }
}
