//! Propagation of W3C trace context and the correlation id on calls to the
//! platform API. See https://www.w3.org/TR/trace-context/.

use opentelemetry::trace::{SpanContext, TraceContextExt};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub const TRACEPARENT_HEADER: &str = "traceparent";
pub const TRACESTATE_HEADER: &str = "tracestate";
/// Correlates a console request with the platform API calls it makes.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Renders `00-{trace id}-{span id}-{flags}` for a sampled or unsampled span.
fn traceparent(span_context: &SpanContext) -> Option<HeaderValue> {
    let flags = span_context.trace_flags().to_u8();
    HeaderValue::from_str(&format!(
        "00-{}-{}-{flags:02x}",
        span_context.trace_id(),
        span_context.span_id(),
    ))
    .ok()
}

/// Copies the current span's OpenTelemetry context into `headers`.
///
/// Without an OTLP exporter the span context is invalid and nothing is written.
pub fn inject_trace_context(headers: &mut HeaderMap) {
    let otel_context = Span::current().context();
    let span_ref = otel_context.span();
    let span_context = span_ref.span_context();
    if !span_context.is_valid() {
        return;
    }

    if let Some(value) = traceparent(span_context) {
        headers.insert(TRACEPARENT_HEADER, value);
    }
    let state = span_context.trace_state().header();
    if let Some(value) = (!state.is_empty())
        .then(|| HeaderValue::from_str(&state).ok())
        .flatten()
    {
        headers.insert(TRACESTATE_HEADER, value);
    }
}

/// Trace context plus the caller's correlation id, if it is a valid header value.
pub fn inject_trace_headers(headers: &mut HeaderMap, request_id: Option<&str>) {
    inject_trace_context(headers);
    if let Some(value) = request_id.and_then(|id| HeaderValue::from_str(id).ok()) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
}

pub fn extract_request_id(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(REQUEST_ID_HEADER)?;
    value.to_str().ok().map(str::to_owned)
}

/// Starts a `reqwest` request that already carries the current trace context.
pub trait TracedClientExt {
    fn traced(&self, method: Method, url: &str) -> RequestBuilder;
}

impl TracedClientExt for reqwest::Client {
    fn traced(&self, method: Method, url: &str) -> RequestBuilder {
        let mut trace_headers = HeaderMap::with_capacity(2);
        inject_trace_context(&mut trace_headers);
        self.request(method, url).headers(trace_headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_span_context_writes_nothing() {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);
        assert!(headers.is_empty());
    }

    #[test]
    fn request_id_is_forwarded_without_traceparent() {
        let mut headers = HeaderMap::new();
        inject_trace_headers(&mut headers, Some("abc-123"));

        assert_eq!(extract_request_id(&headers), Some("abc-123".to_string()));
        assert!(headers.get(TRACEPARENT_HEADER).is_none());
    }

    #[test]
    fn traced_request_keeps_method_and_url() {
        let client = reqwest::Client::new();
        let request = client
            .traced(Method::PATCH, "http://localhost:5000/api/v1/admin/orders/1/status")
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::PATCH);
        assert_eq!(request.url().path(), "/api/v1/admin/orders/1/status");
    }
}
