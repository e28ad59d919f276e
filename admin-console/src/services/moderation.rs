use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::endpoints;
use crate::api::{ApiClient, ApiResult, RequestConfig, RequestDescriptor};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphaAssignment {
    pub alpha_id: String,
    pub agreed_price: f64,
}

/// State-changing admin actions. Each returns the platform's reply body.
#[derive(Clone)]
pub struct ModerationService {
    client: Arc<ApiClient>,
}

impl ModerationService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn update_order_status(&self, order_id: &str, status: &str) -> ApiResult<Value> {
        let request = RequestDescriptor::new(Method::PATCH, endpoints::order_status(order_id))
            .json(json!({ "status": status }));
        self.perform(request).await
    }

    pub async fn approve_payment(&self, request_id: &str) -> ApiResult<Value> {
        self.post(endpoints::approve_payment(request_id)).await
    }

    pub async fn reject_payment(&self, request_id: &str) -> ApiResult<Value> {
        self.post(endpoints::reject_payment(request_id)).await
    }

    pub async fn release_seller_payment(&self, order_id: &str) -> ApiResult<Value> {
        self.post(endpoints::release_seller_payment(order_id)).await
    }

    pub async fn release_alpha_payment(&self, assignment_id: &str) -> ApiResult<Value> {
        self.post(endpoints::release_alpha_payment(assignment_id)).await
    }

    pub async fn verify_alpha(&self, alpha_id: &str) -> ApiResult<Value> {
        self.post(endpoints::verify_alpha(alpha_id)).await
    }

    pub async fn suspend_alpha(&self, alpha_id: &str) -> ApiResult<Value> {
        self.post(endpoints::suspend_alpha(alpha_id)).await
    }

    pub async fn assign_alpha(
        &self,
        assignment_id: &str,
        assignment: &AlphaAssignment,
    ) -> ApiResult<Value> {
        self.client
            .post(
                &endpoints::assign_alpha(assignment_id),
                assignment,
                RequestConfig::new(),
            )
            .await
    }

    pub async fn approve_post(&self, post_id: &str) -> ApiResult<Value> {
        self.post(endpoints::approve_post(post_id)).await
    }

    pub async fn reject_post(&self, post_id: &str) -> ApiResult<Value> {
        self.post(endpoints::reject_post(post_id)).await
    }

    pub async fn approve_printout_order(&self, order_id: &str) -> ApiResult<Value> {
        self.perform(RequestDescriptor::new(
            Method::PATCH,
            endpoints::approve_printout_order(order_id),
        ))
        .await
    }

    pub async fn delete_listing(&self, listing_id: &str) -> ApiResult<Value> {
        self.remove(endpoints::listing_by_id(listing_id)).await
    }

    pub async fn delete_assignment(&self, assignment_id: &str) -> ApiResult<Value> {
        self.remove(endpoints::assignment_by_id(assignment_id)).await
    }

    pub async fn delete_story(&self, story_id: &str) -> ApiResult<Value> {
        self.remove(endpoints::story_by_id(story_id)).await
    }

    async fn post(&self, path: String) -> ApiResult<Value> {
        self.perform(RequestDescriptor::new(Method::POST, path)).await
    }

    async fn remove(&self, path: String) -> ApiResult<Value> {
        self.perform(RequestDescriptor::new(Method::DELETE, path)).await
    }

    async fn perform(&self, request: RequestDescriptor) -> ApiResult<Value> {
        let method = request.method.clone();
        let path = request.path.clone();
        let reply = self.client.send(request).await?;
        tracing::info!(%method, %path, status = reply.status.as_u16(), "Admin action applied");
        Ok(reply.body)
    }
}
