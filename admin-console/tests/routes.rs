mod common;

use admin_console::startup::build_router;
use admin_console::AppState;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use common::{login_body, TestConsole};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn app(console: &TestConsole) -> Router {
    build_router(AppState::new(Arc::clone(&console.client), "/login"))
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_check_works() {
    let console = TestConsole::start().await;

    let response = app(&console)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn me_requires_a_session() {
    let console = TestConsole::start().await;

    let response = app(&console)
        .oneshot(Request::builder().uri("/auth/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn verify_signs_in_and_redirects_home() {
    let console = TestConsole::start().await;

    Mock::given(method("POST"))
        .and(path(TestConsole::path("/admin-auth/otp/verify")))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("T1", Some("R1"))))
        .mount(&console.server)
        .await;

    let response = app(&console)
        .oneshot(json_request(
            "POST",
            "/auth/otp/verify",
            json!({ "phone": "9876543210", "collegeId": "c1", "otp": "123456" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("hx-redirect").unwrap(), "/");
    let body = json_body(response).await;
    assert_eq!(body["data"]["name"], "Ann");
    assert!(body["error"].is_null());

    let me = app(&console)
        .oneshot(Request::builder().uri("/auth/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(json_body(me).await["id"], "a1");
}

#[tokio::test]
async fn failed_otp_send_echoes_upstream_status() {
    let console = TestConsole::start().await;

    Mock::given(method("POST"))
        .and(path(TestConsole::path("/admin-auth/otp/send")))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Admin not found" })),
        )
        .mount(&console.server)
        .await;

    let response = app(&console)
        .oneshot(json_request(
            "POST",
            "/auth/otp/send",
            json!({ "phone": "9876543210", "collegeId": "c1" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert!(body["data"].is_null());
    assert_eq!(body["error"]["message"], "Admin not found");
    assert_eq!(body["error"]["kind"], "server_rejected");
    assert_eq!(body["error"]["status"], 404);
}

#[tokio::test]
async fn logout_clears_session_and_redirects_to_login() {
    let console = TestConsole::signed_in("T1", Some("R1")).await;

    let response = app(&console)
        .oneshot(Request::builder().method("POST").uri("/auth/logout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("hx-redirect").unwrap(), "/login");
    assert!(console.storage.is_empty());
}

#[tokio::test]
async fn resources_are_paginated() {
    let console = TestConsole::signed_in("T1", Some("R1")).await;
    let items: Vec<Value> = (0..25).map(|i| json!({ "_id": format!("i{}", i) })).collect();

    Mock::given(method("GET"))
        .and(path(TestConsole::path("/admin/items")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(&console.server)
        .await;

    let response = app(&console)
        .oneshot(
            Request::builder()
                .uri("/resources/items?page=2&limit=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["page"], 2);
    assert_eq!(body["data"]["limit"], 10);
    assert_eq!(body["data"]["total"], 25);
    assert_eq!(body["data"]["totalPages"], 3);
    assert_eq!(body["data"]["items"][0]["_id"], "i10");
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn unknown_resource_is_not_found() {
    let console = TestConsole::signed_in("T1", Some("R1")).await;

    let response = app(&console)
        .oneshot(Request::builder().uri("/resources/invoices").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn proxy_forwards_method_query_body_and_request_id() {
    let console = TestConsole::signed_in("T1", Some("R1")).await;

    Mock::given(method("PATCH"))
        .and(path(TestConsole::path("/admin/orders/o1/status")))
        .and(query_param("notify", "true"))
        .and(header("authorization", "Bearer T1"))
        .and(header("x-request-id", "req-42"))
        .and(body_json(json!({ "status": "shipped" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&console.server)
        .await;

    let mut request = json_request(
        "PATCH",
        "/api/admin/orders/o1/status?notify=true",
        json!({ "status": "shipped" }),
    );
    request
        .headers_mut()
        .insert("x-request-id", "req-42".parse().unwrap());

    let response = app(&console).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "data": { "success": true }, "error": null }));
}

#[tokio::test]
async fn proxy_rejects_malformed_json() {
    let console = TestConsole::signed_in("T1", Some("R1")).await;

    let response = app(&console)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/payments/requests/p1/approve")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn proxy_redirects_to_login_when_session_cannot_be_renewed() {
    let console = TestConsole::signed_in("T1", Some("R1")).await;

    Mock::given(method("GET"))
        .and(path(TestConsole::path("/admin/dashboard")))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&console.server)
        .await;
    Mock::given(method("POST"))
        .and(path(TestConsole::path("/admin-auth/refresh")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "expired" })))
        .expect(1)
        .mount(&console.server)
        .await;

    let response = app(&console)
        .oneshot(Request::builder().uri("/api/admin/dashboard").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers().get("hx-redirect").unwrap(), "/login");
    let body = json_body(response).await;
    assert_eq!(body["error"]["kind"], "session_invalid");
    assert!(!console.session.is_authenticated().await);
}
