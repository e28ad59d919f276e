use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use console_core::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::api_response;
use crate::services::Resource;
use crate::utils::{Pagination, DEFAULT_PAGE_SIZE};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePage {
    pub items: Vec<Value>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl ResourcePage {
    /// Cut the requested page out of the full list. An out-of-range page
    /// falls back to the first one.
    pub fn build(items: &[Value], params: &PageParams) -> Self {
        let mut pagination = Pagination::new(params.limit.unwrap_or(DEFAULT_PAGE_SIZE))
            .with_total(items.len() as u64);
        if let Some(page) = params.page {
            pagination.go_to(page);
        }

        Self {
            items: pagination.slice(items).to_vec(),
            page: pagination.page(),
            limit: pagination.limit(),
            total: pagination.total(),
            total_pages: pagination.total_pages(),
        }
    }
}

pub async fn list_resource_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Response, AppError> {
    let resource: Resource = name
        .parse()
        .map_err(|e| AppError::NotFound(anyhow::Error::new(e)))?;

    let result = state
        .resources
        .list(resource)
        .await
        .map(|items| ResourcePage::build(&items, &params));

    Ok(api_response(result, StatusCode::OK, &state.login_route))
}
