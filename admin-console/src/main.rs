use admin_console::api::ApiClient;
use admin_console::config::get_configuration;
use admin_console::navigation::BroadcastNavigator;
use admin_console::session::{FileStorage, KeyValueStorage, MemoryStorage, SessionStore};
use admin_console::startup::build_router;
use admin_console::AppState;
use console_core::observability::init_tracing;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "admin-console",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    );

    let storage: Arc<dyn KeyValueStorage> = match &configuration.storage.path {
        Some(path) => {
            info!(path = %path.display(), "Using file-backed session storage");
            Arc::new(FileStorage::new(path.clone()))
        }
        None => {
            info!("Using in-memory session storage");
            Arc::new(MemoryStorage::new())
        }
    };

    let session = Arc::new(SessionStore::restore(storage).await.map_err(|e| {
        tracing::error!("Failed to restore session: {}", e);
        anyhow::anyhow!("Session restore failed: {}", e)
    })?);

    let navigator = Arc::new(BroadcastNavigator::new());
    let mut navigations = navigator.subscribe();
    tokio::spawn(async move {
        loop {
            match navigations.recv().await {
                Ok(navigation) => {
                    info!(route = %navigation.route, "Session ended, console must return to login")
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Navigation listener lagged")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let client = Arc::new(ApiClient::new(&configuration.api, session, navigator)?);
    info!(base_url = %client.base_url(), "Platform API client ready");

    let app = build_router(AppState::new(client, configuration.api.login_route.clone()));

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting admin-console on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
