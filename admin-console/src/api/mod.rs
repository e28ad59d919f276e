pub mod client;
pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod refresh;
pub mod request;
pub mod upload;

pub use client::ApiClient;
pub use error::{ApiError, ApiResponse, ApiResult, ErrorKind, Reply};
pub use request::{Attempt, Payload, RequestConfig, RequestDescriptor};
pub use upload::{ProgressFn, UploadFile, UploadForm};
