use console_core::observability::TracedClientExt;
use reqwest::Method;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use super::error::{ApiError, ApiResult, Reply};
use super::middleware::{apply_authorization, classify, resolve_url};
use super::refresh::{RefreshOutcome, TokenRefresher};
use super::request::{Attempt, Payload, RequestConfig, RequestDescriptor};
use super::upload::{build_form, percent, ProgressFn, UploadForm};
use crate::config::ApiSettings;
use crate::navigation::Navigator;
use crate::session::SessionStore;

/// Authenticated client for the platform REST API.
///
/// Every call reads the access token from the session at send time. A 401
/// on the first attempt triggers one refresh and one reissue; every other
/// failure is returned as an `ApiError` without retrying.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    refresher: TokenRefresher,
}

impl ApiClient {
    pub fn new(
        settings: &ApiSettings,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                anyhow::anyhow!("HTTP client construction failed: {}", e)
            })?;

        let refresher = TokenRefresher::new(
            http.clone(),
            resolve_url(&settings.base_url, &settings.refresh_path),
            settings.login_route.clone(),
            Arc::clone(&session),
            navigator,
        );

        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
            session,
            refresher,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, config: RequestConfig) -> ApiResult<T> {
        self.send(RequestDescriptor::new(Method::GET, path).with_config(config))
            .await?
            .decode()
    }

    pub async fn post<T, B>(&self, path: &str, body: &B, config: RequestConfig) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::POST, path, body, config).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B, config: RequestConfig) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PUT, path, body, config).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B, config: RequestConfig) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PATCH, path, body, config).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> ApiResult<T> {
        self.send(RequestDescriptor::new(Method::DELETE, path).with_config(config))
            .await?
            .decode()
    }

    /// Multipart POST. `on_progress` receives 0 to 100 as file bytes are sent;
    /// a retried upload reports from 0 again.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: UploadForm,
        on_progress: Option<ProgressFn>,
    ) -> ApiResult<T> {
        let request = RequestDescriptor::new(Method::POST, path).multipart(form);
        self.execute(&request, on_progress.as_ref()).await?.decode()
    }

    /// Issue a call and return the raw reply.
    pub async fn send(&self, request: RequestDescriptor) -> ApiResult<Reply> {
        self.execute(&request, None).await
    }

    async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        config: RequestConfig,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::request_setup(format!("Failed to encode request body: {}", e)))?;
        self.send(RequestDescriptor::new(method, path).json(body).with_config(config))
            .await?
            .decode()
    }

    async fn execute(
        &self,
        request: &RequestDescriptor,
        on_progress: Option<&ProgressFn>,
    ) -> ApiResult<Reply> {
        let mut attempt = Attempt::First;

        loop {
            let access_token = self.session.access_token().await;
            let outcome = self.dispatch(request, access_token.as_ref(), on_progress).await;

            match outcome {
                Err(err) if err.is_auth_expired() && attempt.may_refresh() => {
                    attempt = Attempt::Retried;
                    match self.refresher.refresh(access_token.as_ref()).await? {
                        RefreshOutcome::Renewed => {
                            tracing::debug!(
                                method = %request.method,
                                path = %request.path,
                                "Retrying request with refreshed token"
                            );
                        }
                        RefreshOutcome::Unavailable => {
                            log_failure(request, &err);
                            return Err(err);
                        }
                    }
                }
                Err(err) => {
                    log_failure(request, &err);
                    return Err(err);
                }
                Ok(reply) => {
                    tracing::debug!(
                        method = %request.method,
                        path = %request.path,
                        status = reply.status.as_u16(),
                        "API response"
                    );
                    return Ok(reply);
                }
            }
        }
    }

    /// One attempt: build from the descriptor, attach the token, send, classify.
    async fn dispatch(
        &self,
        request: &RequestDescriptor,
        access_token: Option<&SecretString>,
        on_progress: Option<&ProgressFn>,
    ) -> ApiResult<Reply> {
        let url = resolve_url(&self.base_url, &request.path);

        let mut headers = request.config.headers.clone();
        apply_authorization(&mut headers, access_token);

        let mut builder = self
            .http
            .traced(request.method.clone(), &url)
            .headers(headers);
        if !request.config.query.is_empty() {
            builder = builder.query(&request.config.query);
        }
        if let Some(timeout) = request.config.timeout {
            builder = builder.timeout(timeout);
        }
        builder = match &request.payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(body),
            Payload::Multipart(form) => builder.multipart(build_form(form, on_progress.cloned())?),
        };

        tracing::debug!(method = %request.method, path = %request.path, "API request");
        let outcome = builder.send().await;

        // With no file bytes there is nothing to stream, so completion is the only progress.
        if let (Payload::Multipart(form), Some(on_progress), Ok(_)) =
            (&request.payload, on_progress, &outcome)
        {
            if form.total_bytes() == 0 {
                on_progress(percent(0, 0));
            }
        }
        classify(outcome).await
    }
}

fn log_failure(request: &RequestDescriptor, err: &ApiError) {
    if err.is_forbidden() {
        tracing::warn!(path = %request.path, "Access denied: insufficient permissions");
    } else if err.is_no_response() {
        tracing::warn!(path = %request.path, "Network error: unable to reach server");
    } else {
        tracing::warn!(
            method = %request.method,
            path = %request.path,
            status = err.status,
            kind = ?err.kind,
            message = %err.message,
            "API request failed"
        );
    }
}
