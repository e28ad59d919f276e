use axum::{
    body::Body,
    middleware::from_fn,
    routing::{any, get, post},
    Router,
};
use console_core::middleware::{make_request_span, request_id_middleware};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    app::health_check,
    auth::{logout_handler, me_handler, send_otp_handler, verify_otp_handler},
    proxy::proxy_handler,
    resources::list_resource_handler,
};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/otp/send", post(send_otp_handler))
        .route("/auth/otp/verify", post(verify_otp_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/auth/me", get(me_handler))
        .route("/resources/:name", get(list_resource_handler))
        .route("/api/*path", any(proxy_handler))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
