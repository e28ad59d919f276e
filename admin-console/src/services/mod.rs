pub mod analytics;
pub mod auth;
pub mod moderation;
pub mod resources;

pub use analytics::{AnalyticsApi, AnalyticsQuery};
pub use auth::{AuthService, OtpDispatch, OtpRequest, OtpVerification};
pub use moderation::{AlphaAssignment, ModerationService};
pub use resources::{extract_list, Resource, ResourcesService, UnknownResource};
