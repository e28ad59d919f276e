//! Paths of the platform API, relative to the configured base URL.

pub const ADMIN_AUTH_SEND_OTP: &str = "/admin-auth/otp/send";
pub const ADMIN_AUTH_VERIFY_OTP: &str = "/admin-auth/otp/verify";
pub const ADMIN_AUTH_REFRESH: &str = "/admin-auth/refresh";

pub const DASHBOARD: &str = "/admin/dashboard";

pub const ORDERS: &str = "/admin/orders";
pub const PAYMENT_REQUESTS: &str = "/admin/payments/requests";
pub const ITEMS: &str = "/admin/items";
pub const ADMIN_USERS: &str = "/admin/users";
pub const PENDING_POSTS: &str = "/admin/posts/pending";

pub const LISTINGS: &str = "/listings";
pub const ALPHAS: &str = "/alphas";
pub const USERS: &str = "/users";
pub const POSTS: &str = "/community/posts";
pub const STORIES: &str = "/community/stories";
pub const STORY_FEED: &str = "/community/stories/feed";
pub const ASSIGNMENTS: &str = "/assignments";
pub const TRANSACTIONS: &str = "/transactions";

pub const VENDORS: &str = "/vendors";
pub const VENDOR_PRODUCTS: &str = "/vendors/products";
pub const FOOD_ORDERS: &str = "/lazypeeps/orders";
pub const PRINTOUT_ORDERS: &str = "/lazypeeps/printout-orders";

pub fn order_by_id(id: &str) -> String {
    format!("{}/{}", ORDERS, id)
}

pub fn order_status(id: &str) -> String {
    format!("{}/{}/status", ORDERS, id)
}

pub fn approve_payment(id: &str) -> String {
    format!("{}/{}/approve", PAYMENT_REQUESTS, id)
}

pub fn reject_payment(id: &str) -> String {
    format!("{}/{}/reject", PAYMENT_REQUESTS, id)
}

pub fn release_seller_payment(order_id: &str) -> String {
    format!("/admin/payments/release/seller/{}", order_id)
}

pub fn release_alpha_payment(assignment_id: &str) -> String {
    format!("/admin/payments/release/alpha/{}", assignment_id)
}

pub fn verify_alpha(id: &str) -> String {
    format!("/admin/alphas/{}/verify", id)
}

pub fn suspend_alpha(id: &str) -> String {
    format!("/admin/alphas/{}/suspend", id)
}

pub fn listing_by_id(id: &str) -> String {
    format!("{}/{}", LISTINGS, id)
}

pub fn user_by_id(id: &str) -> String {
    format!("{}/{}", USERS, id)
}

pub fn approve_post(id: &str) -> String {
    format!("/admin/posts/{}/approve", id)
}

pub fn reject_post(id: &str) -> String {
    format!("/admin/posts/{}/reject", id)
}

pub fn story_by_id(id: &str) -> String {
    format!("{}/{}", STORIES, id)
}

pub fn assignment_by_id(id: &str) -> String {
    format!("{}/{}", ASSIGNMENTS, id)
}

pub fn assign_alpha(assignment_id: &str) -> String {
    format!("{}/{}/assign-alpha", ASSIGNMENTS, assignment_id)
}

pub fn approve_printout_order(id: &str) -> String {
    format!("{}/{}/approve", PRINTOUT_ORDERS, id)
}
