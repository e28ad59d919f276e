use secrecy::{ExposeSecret, Secret, SecretString};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::storage::{
    KeyValueStorage, StorageError, ACCESS_TOKEN_KEY, ADMIN_DATA_KEY, REFRESH_TOKEN_KEY,
};
use super::{AdminIdentity, LoginResponse, Session};

/// Holds the single active session and mirrors it into storage.
///
/// Writers keep the lock across the storage write, so readers observe
/// either the previous session or the new one, never a mix.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// An empty store. Nothing is read from `storage`.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            current: RwLock::new(None),
        }
    }

    /// Rebuild the session persisted by a previous run.
    ///
    /// A session needs both the access token and the admin data; partial
    /// or unreadable state is cleared.
    pub async fn restore(storage: Arc<dyn KeyValueStorage>) -> Result<Self, StorageError> {
        let access_token = storage.get(ACCESS_TOKEN_KEY).await?;
        let admin_data = storage.get(ADMIN_DATA_KEY).await?;
        let refresh_token = storage.get(REFRESH_TOKEN_KEY).await?;

        let store = Self::new(storage);
        match (access_token, admin_data) {
            (Some(access_token), Some(admin_data)) => {
                match serde_json::from_str::<AdminIdentity>(&admin_data) {
                    Ok(admin) => {
                        tracing::info!(admin_id = ?admin.id, "Restored admin session");
                        *store.current.write().await = Some(Session {
                            access_token: Secret::new(access_token),
                            refresh_token: refresh_token.map(Secret::new),
                            admin,
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Stored admin data is unreadable, clearing session");
                        store.destroy().await?;
                    }
                }
            }
            (None, None) if refresh_token.is_none() => {}
            _ => {
                tracing::warn!("Stored session is incomplete, clearing it");
                store.destroy().await?;
            }
        }

        Ok(store)
    }

    /// Start a session from a login response, replacing any current one.
    ///
    /// If any key fails to persist, the previous session is ended as well and
    /// every stored key is cleared, so a later `restore` cannot pair the new
    /// token with old admin data.
    pub async fn begin(&self, login: LoginResponse) -> Result<AdminIdentity, StorageError> {
        let session = Session::from(login);
        let admin_data = serde_json::to_string(&session.admin)?;

        let mut current = self.current.write().await;
        if let Err(e) = self.persist(&session, &admin_data).await {
            tracing::error!(error = %e, "Failed to persist new session, clearing stored session");
            *current = None;
            self.clear_keys().await;
            return Err(e);
        }

        let admin = session.admin.clone();
        *current = Some(session);
        tracing::info!(admin_id = ?admin.id, "Admin session started");
        Ok(admin)
    }

    async fn persist(&self, session: &Session, admin_data: &str) -> Result<(), StorageError> {
        self.storage
            .set(ACCESS_TOKEN_KEY, session.access_token.expose_secret())
            .await?;
        match &session.refresh_token {
            Some(token) => self.storage.set(REFRESH_TOKEN_KEY, token.expose_secret()).await?,
            None => self.storage.remove(REFRESH_TOKEN_KEY).await?,
        }
        self.storage.set(ADMIN_DATA_KEY, admin_data).await
    }

    /// Best effort; a key that cannot be removed is logged and skipped.
    async fn clear_keys(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ADMIN_DATA_KEY] {
            if let Err(e) = self.storage.remove(key).await {
                tracing::warn!(key, error = %e, "Failed to remove stored session key");
            }
        }
    }

    pub async fn access_token(&self) -> Option<SecretString> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub async fn refresh_token(&self) -> Option<SecretString> {
        self.current
            .read()
            .await
            .as_ref()
            .and_then(|s| s.refresh_token.clone())
    }

    pub async fn identity(&self) -> Option<AdminIdentity> {
        self.current.read().await.as_ref().map(|s| s.admin.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Install a refreshed access token.
    ///
    /// Returns `false` without touching anything when there is no session,
    /// so a late refresh cannot resurrect a session that was torn down.
    /// The in-memory token is replaced even if persisting it fails.
    pub async fn replace_access_token(&self, token: SecretString) -> Result<bool, StorageError> {
        let mut current = self.current.write().await;
        let Some(session) = current.as_mut() else {
            return Ok(false);
        };

        let persisted = self
            .storage
            .set(ACCESS_TOKEN_KEY, token.expose_secret())
            .await;
        session.access_token = token;
        persisted.map(|()| true)
    }

    /// Drop the session and every stored key. Safe to call with no session.
    pub async fn destroy(&self) -> Result<(), StorageError> {
        let mut current = self.current.write().await;
        let had_session = current.take().is_some();

        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ADMIN_DATA_KEY] {
            self.storage.remove(key).await?;
        }

        if had_session {
            tracing::info!("Admin session destroyed");
        }
        Ok(())
    }
}
