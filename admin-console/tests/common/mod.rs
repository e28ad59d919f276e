#![allow(dead_code)]

use admin_console::api::ApiClient;
use admin_console::config::ApiSettings;
use admin_console::navigation::{BroadcastNavigator, Navigation};
use admin_console::session::{LoginResponse, MemoryStorage, SessionStore};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::broadcast;
use wiremock::MockServer;

pub const API_PREFIX: &str = "/api/v1";

/// A client wired to a mock platform API with in-memory session storage.
pub struct TestConsole {
    pub server: MockServer,
    pub client: Arc<ApiClient>,
    pub session: Arc<SessionStore>,
    pub storage: Arc<MemoryStorage>,
    pub navigations: broadcast::Receiver<Navigation>,
}

impl TestConsole {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let settings = ApiSettings::new(format!("{}{}", server.uri(), API_PREFIX));

        let storage = Arc::new(MemoryStorage::new());
        let session = Arc::new(SessionStore::new(storage.clone()));
        let navigator = Arc::new(BroadcastNavigator::new());
        let navigations = navigator.subscribe();

        let client = Arc::new(
            ApiClient::new(&settings, Arc::clone(&session), navigator)
                .expect("Failed to build API client"),
        );

        Self {
            server,
            client,
            session,
            storage,
            navigations,
        }
    }

    /// Start with a session holding the given tokens, as after a login.
    pub async fn signed_in(access_token: &str, refresh_token: Option<&str>) -> Self {
        let console = Self::start().await;
        console
            .session
            .begin(login_response(access_token, refresh_token))
            .await
            .expect("Failed to begin session");
        console
    }

    /// Mock path under the API prefix.
    pub fn path(suffix: &str) -> String {
        format!("{}{}", API_PREFIX, suffix)
    }

    /// Navigations emitted so far, without waiting.
    pub fn drain_navigations(&mut self) -> Vec<Navigation> {
        let mut seen = Vec::new();
        while let Ok(navigation) = self.navigations.try_recv() {
            seen.push(navigation);
        }
        seen
    }
}

pub fn login_body(access_token: &str, refresh_token: Option<&str>) -> serde_json::Value {
    let mut tokens = json!({ "accessToken": access_token });
    if let Some(refresh_token) = refresh_token {
        tokens["refreshToken"] = json!(refresh_token);
    }
    json!({
        "admin": { "id": "a1", "name": "Ann", "role": "super_admin" },
        "tokens": tokens,
    })
}

pub fn login_response(access_token: &str, refresh_token: Option<&str>) -> LoginResponse {
    serde_json::from_value(login_body(access_token, refresh_token))
        .expect("Login fixture must deserialize")
}
