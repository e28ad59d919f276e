use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::endpoints::ADMIN_AUTH_REFRESH;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub api: ApiSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiSettings {
    /// Platform REST API root, e.g. `https://api.example.edu/api/v1`.
    pub base_url: String,
    /// Ceiling for a single call; an unfinished call becomes a no-response failure.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    /// Route the host is sent to once the session cannot be recovered.
    #[serde(default = "default_login_route")]
    pub login_route: String,
}

impl ApiSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
            refresh_path: default_refresh_path(),
            login_route: default_login_route(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_refresh_path() -> String {
    ADMIN_AUTH_REFRESH.to_string()
}

fn default_login_route() -> String {
    "/login".to_string()
}

/// Where the session survives restarts. No path keeps it in memory only.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct StorageSettings {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;

    // Works from the workspace root and from inside the crate directory.
    let configuration_directory = if base_path.ends_with("admin-console") {
        base_path.join("config")
    } else {
        base_path.join("admin-console").join("config")
    };

    console_core::config::load_settings(&configuration_directory)
}
