//! The boundary where requests leave the process.
//!
//! The invocation pipeline only ever talks to a [`Transport`]. Bodies cross
//! this boundary as JSON values; serialization, connection handling and
//! retries (if any) are the transport's business.

mod client;

pub use client::HttpTransport;

use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;

use crate::error::TransportError;

/// A fully rendered request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    /// Rendered path relative to the endpoint, starting with `/`
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

/// A response with its body already parsed.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// `Value::Null` for an empty body, a JSON string when the payload is not JSON
    pub body: Value,
}

impl TransportResponse {
    /// Response header as a string, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Sends a request and returns the response, whatever its status.
///
/// Implementations must not turn non-2xx statuses into errors; the pipeline
/// validates statuses against the operation descriptor.
#[async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response could be obtained.
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
