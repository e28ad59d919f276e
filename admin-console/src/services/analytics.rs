use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::api::{ApiClient, ApiResult, RequestConfig, RequestDescriptor};

const ANALYTICS_ADMIN: &str = "/analytics/admin";
const PLATFORM_ANALYTICS: &str = "/admin/analytics";

/// Filters accepted by the analytics list endpoints. Unset fields are omitted.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
}

/// Engagement analytics and platform reports.
#[derive(Clone)]
pub struct AnalyticsApi {
    client: Arc<ApiClient>,
}

impl AnalyticsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn overview(&self) -> ApiResult<Value> {
        self.fetch(&format!("{}/overview", ANALYTICS_ADMIN), RequestConfig::new())
            .await
    }

    pub async fn users(&self, query: &AnalyticsQuery) -> ApiResult<Value> {
        self.fetch(
            &format!("{}/users", ANALYTICS_ADMIN),
            RequestConfig::new().params(query),
        )
        .await
    }

    pub async fn user_detail(&self, user_id: &str) -> ApiResult<Value> {
        self.fetch(
            &format!("{}/users/{}", ANALYTICS_ADMIN, user_id),
            RequestConfig::new(),
        )
        .await
    }

    pub async fn user_recommendations(&self, user_id: &str) -> ApiResult<Value> {
        self.fetch(
            &format!("{}/users/{}/recommendations", ANALYTICS_ADMIN, user_id),
            RequestConfig::new(),
        )
        .await
    }

    pub async fn societies(&self, query: &AnalyticsQuery) -> ApiResult<Value> {
        self.fetch(
            &format!("{}/societies", ANALYTICS_ADMIN),
            RequestConfig::new().params(query),
        )
        .await
    }

    pub async fn society_detail(&self, society_id: &str) -> ApiResult<Value> {
        self.fetch(
            &format!("{}/societies/{}", ANALYTICS_ADMIN, society_id),
            RequestConfig::new(),
        )
        .await
    }

    pub async fn posts(&self, query: &AnalyticsQuery) -> ApiResult<Value> {
        self.fetch(
            &format!("{}/posts", ANALYTICS_ADMIN),
            RequestConfig::new().params(query),
        )
        .await
    }

    pub async fn post_detail(&self, post_id: &str) -> ApiResult<Value> {
        self.fetch(
            &format!("{}/posts/{}", ANALYTICS_ADMIN, post_id),
            RequestConfig::new(),
        )
        .await
    }

    /// Ask the platform to recompute one user's aggregates.
    pub async fn aggregate_user(&self, user_id: &str) -> ApiResult<Value> {
        let path = format!("{}/aggregate/user/{}", ANALYTICS_ADMIN, user_id);
        let reply = self
            .client
            .send(RequestDescriptor::new(Method::POST, path))
            .await?;
        Ok(reply.body)
    }

    /// Marketplace reports: `users`, `revenue` or `assignments` over a period.
    pub async fn platform_report(&self, report: &str, period: &str) -> ApiResult<Value> {
        self.fetch(
            &format!("{}/{}", PLATFORM_ANALYTICS, report),
            RequestConfig::new().query("period", period),
        )
        .await
    }

    pub async fn alpha_performance(&self) -> ApiResult<Value> {
        self.fetch(&format!("{}/alphas", PLATFORM_ANALYTICS), RequestConfig::new())
            .await
    }

    pub async fn assignment_list(&self, status: Option<&str>) -> ApiResult<Value> {
        let mut config = RequestConfig::new();
        if let Some(status) = status {
            config = config.query("status", status);
        }
        self.fetch(&format!("{}/assignments/list", PLATFORM_ANALYTICS), config)
            .await
    }

    async fn fetch(&self, path: &str, config: RequestConfig) -> ApiResult<Value> {
        self.client.get(path, config).await
    }
}
