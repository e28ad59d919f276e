use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::api::endpoints;
use crate::api::{ApiClient, ApiError, ApiResult, RequestConfig};

/// A list the console shows, with where it lives and how it is wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Orders,
    PaymentRequests,
    Items,
    Alphas,
    Users,
    Assignments,
    Transactions,
    Posts,
    PendingPosts,
    Stories,
    Vendors,
    VendorProducts,
    FoodOrders,
    PrintoutOrders,
}

impl Resource {
    pub const ALL: [Resource; 14] = [
        Resource::Orders,
        Resource::PaymentRequests,
        Resource::Items,
        Resource::Alphas,
        Resource::Users,
        Resource::Assignments,
        Resource::Transactions,
        Resource::Posts,
        Resource::PendingPosts,
        Resource::Stories,
        Resource::Vendors,
        Resource::VendorProducts,
        Resource::FoodOrders,
        Resource::PrintoutOrders,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Resource::Orders => "orders",
            Resource::PaymentRequests => "payment-requests",
            Resource::Items => "items",
            Resource::Alphas => "alphas",
            Resource::Users => "users",
            Resource::Assignments => "assignments",
            Resource::Transactions => "transactions",
            Resource::Posts => "posts",
            Resource::PendingPosts => "pending-posts",
            Resource::Stories => "stories",
            Resource::Vendors => "vendors",
            Resource::VendorProducts => "vendor-products",
            Resource::FoodOrders => "food-orders",
            Resource::PrintoutOrders => "printout-orders",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Resource::Orders => endpoints::ORDERS,
            Resource::PaymentRequests => endpoints::PAYMENT_REQUESTS,
            Resource::Items => endpoints::ITEMS,
            Resource::Alphas => endpoints::ALPHAS,
            Resource::Users => endpoints::ADMIN_USERS,
            Resource::Assignments => endpoints::ASSIGNMENTS,
            Resource::Transactions => endpoints::TRANSACTIONS,
            Resource::Posts => endpoints::POSTS,
            Resource::PendingPosts => endpoints::PENDING_POSTS,
            Resource::Stories => endpoints::STORY_FEED,
            Resource::Vendors => endpoints::VENDORS,
            Resource::VendorProducts => endpoints::VENDOR_PRODUCTS,
            Resource::FoodOrders => endpoints::FOOD_ORDERS,
            Resource::PrintoutOrders => endpoints::PRINTOUT_ORDERS,
        }
    }

    /// Keys the list may sit under, tried in order. Dotted keys walk nested objects.
    pub fn envelope_keys(self) -> &'static [&'static str] {
        match self {
            Resource::Orders => &["orders", "data"],
            Resource::PaymentRequests => &["requests", "data"],
            Resource::Items => &["items", "data"],
            Resource::Alphas => &["alphas", "data"],
            Resource::Users => &["data", "users"],
            Resource::Transactions => &["data", "transactions"],
            Resource::Posts | Resource::PendingPosts => &["data", "posts"],
            Resource::Assignments
            | Resource::Stories
            | Resource::Vendors
            | Resource::VendorProducts
            | Resource::FoodOrders
            | Resource::PrintoutOrders => &["data"],
        }
    }

    /// Upstream page size asked for, where the platform paginates by default.
    pub fn fetch_limit(self) -> Option<u32> {
        match self {
            Resource::Posts | Resource::Assignments => Some(100),
            Resource::Stories => Some(50),
            _ => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown resource '{0}'")]
pub struct UnknownResource(pub String);

impl FromStr for Resource {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|resource| resource.slug() == s)
            .ok_or_else(|| UnknownResource(s.to_string()))
    }
}

/// Pull the list out of a response body.
///
/// A bare array is the list itself. Otherwise the first key holding an array
/// wins; an object with none of the keys yields an empty list. Any other body
/// shape is `None`.
pub fn extract_list(body: &Value, keys: &[&str]) -> Option<Vec<Value>> {
    match body {
        Value::Array(items) => Some(items.clone()),
        Value::Object(_) => Some(
            keys.iter()
                .find_map(|key| lookup(body, key).and_then(Value::as_array))
                .cloned()
                .unwrap_or_default(),
        ),
        _ => None,
    }
}

fn lookup<'a>(body: &'a Value, dotted: &str) -> Option<&'a Value> {
    dotted
        .split('.')
        .try_fold(body, |value, segment| value.get(segment))
}

/// The story feed is grouped by author; spread each group into its stories.
fn flatten_story_feed(groups: Vec<Value>) -> Vec<Value> {
    let mut stories = Vec::new();
    for group in groups {
        match group.get("stories").and_then(Value::as_array) {
            Some(grouped) => {
                let author = group.get("author").cloned();
                for story in grouped {
                    let mut story = story.clone();
                    if let (Some(author), Some(fields)) = (&author, story.as_object_mut()) {
                        fields.insert("author".to_string(), author.clone());
                    }
                    stories.push(story);
                }
            }
            None if group.get("_id").is_some() => stories.push(group),
            None => {}
        }
    }
    stories
}

/// Read access to the console's lists and records.
#[derive(Clone)]
pub struct ResourcesService {
    client: Arc<ApiClient>,
}

impl ResourcesService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn dashboard_stats(&self) -> ApiResult<Value> {
        self.client
            .get(endpoints::DASHBOARD, RequestConfig::new())
            .await
    }

    /// Fetch a resource and unwrap its list from the envelope.
    pub async fn list(&self, resource: Resource) -> ApiResult<Vec<Value>> {
        let mut config = RequestConfig::new();
        if let Some(limit) = resource.fetch_limit() {
            config = config.query("limit", limit);
        }

        let body: Value = self.client.get(resource.path(), config).await?;
        let items = extract_list(&body, resource.envelope_keys()).ok_or_else(|| {
            ApiError::invalid_body(
                StatusCode::OK,
                format!("{} response is not a list", resource),
                body.clone(),
            )
        })?;

        tracing::debug!(resource = %resource, count = items.len(), "Fetched resource list");

        Ok(match resource {
            Resource::Stories => flatten_story_feed(items),
            _ => items,
        })
    }

    pub async fn order(&self, id: &str) -> ApiResult<Value> {
        self.client
            .get(&endpoints::order_by_id(id), RequestConfig::new())
            .await
    }

    pub async fn user(&self, id: &str) -> ApiResult<Value> {
        self.client
            .get(&endpoints::user_by_id(id), RequestConfig::new())
            .await
    }

    pub async fn assignment(&self, id: &str) -> ApiResult<Value> {
        self.client
            .get(&endpoints::assignment_by_id(id), RequestConfig::new())
            .await
    }
}
