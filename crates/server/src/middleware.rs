//! Correlation id and request logging layers.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Error as HeaderError, Header, HeaderMapExt};
use tracing::Instrument;
use uuid::Uuid;

pub static CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

/// `TypedHeader` for the `X-Correlation-ID` request/response header.
///
/// Stored in the request extensions by [`correlation_id`], so handlers can
/// extract it with `Extension<CorrelationId>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Header for CorrelationId {
    fn name() -> &'static HeaderName {
        &CORRELATION_ID_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, HeaderError>
    where
        Self: Sized,
        I: Iterator<Item = &'i HeaderValue>,
    {
        let value = values.next().ok_or_else(HeaderError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(HeaderError::invalid());
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(HeaderError::invalid());
        }

        Ok(CorrelationId(value.to_string()))
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        match HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-correlation-id header"),
        }
    }
}

/// Reuses the caller's correlation id, or generates one, and echoes it back.
pub async fn correlation_id(mut request: Request, next: Next) -> Response {
    let correlation_id = request
        .headers()
        .typed_get::<CorrelationId>()
        .unwrap_or_else(CorrelationId::generate);
    request.extensions_mut().insert(correlation_id.clone());

    let mut response = next.run(request).await;
    response.headers_mut().typed_insert(correlation_id);
    response
}

/// Logs every request and its response inside a span carrying the
/// correlation id.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let correlation_id = request
        .extensions()
        .get::<CorrelationId>()
        .map(ToString::to_string)
        .unwrap_or_default();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let span = tracing::info_span!(
        "http_request",
        correlation_id = %correlation_id,
        method = %method,
        path = %path,
    );

    async move {
        tracing::info!("Inbound HTTP request");
        let started = Instant::now();

        let response = next.run(request).await;

        let status = response.status().as_u16();
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        if response.status().is_server_error() {
            tracing::error!(status, latency_ms, outcome = "error", "Outbound HTTP response");
        } else if response.status().is_client_error() {
            tracing::warn!(status, latency_ms, outcome = "rejected", "Outbound HTTP response");
        } else {
            tracing::info!(status, latency_ms, outcome = "success", "Outbound HTTP response");
        }

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderMap;

    use super::*;

    #[test]
    fn decodes_trimmed_header() {
        let mut headers = HeaderMap::new();
        headers.insert(&CORRELATION_ID_HEADER, HeaderValue::from_static(" req-42 "));
        assert_eq!(
            headers.typed_get::<CorrelationId>(),
            Some(CorrelationId("req-42".to_string()))
        );
    }

    #[test]
    fn blank_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(&CORRELATION_ID_HEADER, HeaderValue::from_static("  "));
        assert!(headers.typed_get::<CorrelationId>().is_none());
    }

    #[test]
    fn generated_ids_are_uuids() {
        let id = CorrelationId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        assert_ne!(id, CorrelationId::generate());
    }

    #[test]
    fn encodes_into_response_headers() {
        let mut headers = HeaderMap::new();
        headers.typed_insert(CorrelationId("abc".to_string()));
        assert_eq!(headers.get(&CORRELATION_ID_HEADER).unwrap(), "abc");
    }
}
