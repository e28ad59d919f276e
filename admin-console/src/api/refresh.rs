//! Access-token refresh, coalesced so concurrent 401s share one exchange.

use console_core::observability::TracedClientExt;
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::Method;
use secrecy::{ExposeSecret, Secret, SecretString};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::error::{ApiError, ApiResult};
use super::middleware::classify;
use crate::navigation::{Navigation, Navigator};
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The session holds a newer access token; the call may be reissued.
    Renewed,
    /// No refresh token is held; the original failure stands.
    Unavailable,
}

type SharedExchange = Shared<BoxFuture<'static, ApiResult<()>>>;

pub struct TokenRefresher {
    http: reqwest::Client,
    refresh_url: String,
    login_route: String,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    in_flight: Mutex<Option<(u64, SharedExchange)>>,
    next_id: AtomicU64,
}

impl TokenRefresher {
    pub fn new(
        http: reqwest::Client,
        refresh_url: String,
        login_route: String,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http,
            refresh_url,
            login_route,
            session,
            navigator,
            in_flight: Mutex::new(None),
            next_id: AtomicU64::new(0),
        }
    }

    /// Obtain a fresh access token after a call made with `stale` got a 401.
    ///
    /// Joins the exchange already in flight if there is one. Otherwise, if
    /// the session has moved past `stale` in the meantime, returns
    /// immediately so the caller retries with the current token.
    pub async fn refresh(&self, stale: Option<&SecretString>) -> ApiResult<RefreshOutcome> {
        let (id, exchange) = {
            let mut slot = self.in_flight.lock().await;
            match slot.as_ref() {
                Some((id, exchange)) => {
                    tracing::debug!("Joining in-flight token refresh");
                    (*id, exchange.clone())
                }
                None => {
                    if self.rotated_since(stale).await {
                        tracing::debug!("Access token already refreshed, retrying with current token");
                        return Ok(RefreshOutcome::Renewed);
                    }

                    let Some(refresh_token) = self.session.refresh_token().await else {
                        tracing::debug!("No refresh token held, not refreshing");
                        return Ok(RefreshOutcome::Unavailable);
                    };

                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let exchange = self.exchange(refresh_token).boxed().shared();
                    *slot = Some((id, exchange.clone()));
                    (id, exchange)
                }
            }
        };

        let result = exchange.await;

        let mut slot = self.in_flight.lock().await;
        if matches!(slot.as_ref(), Some((current, _)) if *current == id) {
            *slot = None;
        }

        result.map(|()| RefreshOutcome::Renewed)
    }

    async fn rotated_since(&self, stale: Option<&SecretString>) -> bool {
        match (self.session.access_token().await, stale) {
            (Some(current), Some(stale)) => current.expose_secret() != stale.expose_secret(),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// The shared exchange. Session teardown and the login redirect live
    /// inside it so they happen once however many calls are waiting.
    fn exchange(
        &self,
        refresh_token: SecretString,
    ) -> impl Future<Output = ApiResult<()>> + Send + 'static {
        let http = self.http.clone();
        let url = self.refresh_url.clone();
        let login_route = self.login_route.clone();
        let session = Arc::clone(&self.session);
        let navigator = Arc::clone(&self.navigator);

        async move {
            match request_access_token(&http, &url, &refresh_token).await {
                Ok(access_token) => {
                    match session.replace_access_token(access_token).await {
                        Ok(true) => tracing::info!("Access token refreshed"),
                        Ok(false) => tracing::warn!("Session ended while refreshing, new token discarded"),
                        Err(e) => tracing::warn!(error = %e, "Refreshed token could not be persisted"),
                    }
                    Ok(())
                }
                Err(err) => {
                    tracing::warn!(
                        status = err.status,
                        message = %err.message,
                        "Token refresh failed, ending session"
                    );
                    if let Err(e) = session.destroy().await {
                        tracing::error!(error = %e, "Failed to clear stored session");
                    }
                    navigator.navigate(Navigation::to(login_route));
                    Err(ApiError::session_invalid(err))
                }
            }
        }
    }
}

/// `POST <refresh_url> { refreshToken }`, sent without an Authorization header.
async fn request_access_token(
    http: &reqwest::Client,
    url: &str,
    refresh_token: &SecretString,
) -> ApiResult<SecretString> {
    let outcome = http
        .traced(Method::POST, url)
        .json(&json!({ "refreshToken": refresh_token.expose_secret() }))
        .send()
        .await;
    let reply = classify(outcome).await?;

    match reply.body.get("accessToken").and_then(Value::as_str) {
        Some(token) if !token.is_empty() => Ok(Secret::new(token.to_string())),
        _ => Err(ApiError::invalid_body(
            reply.status,
            "refresh response has no accessToken",
            reply.body,
        )),
    }
}
