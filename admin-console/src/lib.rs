pub mod api;
pub mod config;
pub mod handlers;
pub mod navigation;
pub mod services;
pub mod session;
pub mod startup;
pub mod utils;

use api::ApiClient;
use services::{AuthService, ResourcesService};
use std::sync::Arc;

/// Shared application state for the console's HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<ApiClient>,
    pub auth: AuthService,
    pub resources: ResourcesService,
    pub login_route: Arc<str>,
}

impl AppState {
    pub fn new(client: Arc<ApiClient>, login_route: impl Into<Arc<str>>) -> Self {
        Self {
            auth: AuthService::new(Arc::clone(&client)),
            resources: ResourcesService::new(Arc::clone(&client)),
            client,
            login_route: login_route.into(),
        }
    }
}
