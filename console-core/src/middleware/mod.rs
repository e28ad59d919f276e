pub mod tracing;

pub use self::tracing::{make_request_span, request_id_middleware};
