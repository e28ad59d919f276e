//! console-core: Shared infrastructure for the campus admin console.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

pub use axum;
pub use reqwest;
pub use tracing;
