#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Common test utilities for nimbus-core integration tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use nimbus_core::auth::StaticTokenProvider;
use nimbus_core::{
    IdempotencyTokenProvider, NimbusClient, NimbusClientBuilder, Transport, TransportError,
    TransportRequest, TransportResponse,
};
use serde_json::Value;

pub const TOKEN: &str = "t0k3n";

/// Replays scripted responses and records every request it receives.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<TransportResponse>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, response: TransportResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left"))
    }
}

pub fn response(status: u16, body: Value) -> TransportResponse {
    TransportResponse {
        status: StatusCode::from_u16(status).unwrap(),
        headers: HeaderMap::new(),
        body,
    }
}

pub fn response_with_header(status: u16, body: Value, name: &str, value: &str) -> TransportResponse {
    let mut response = response(status, body);
    response.headers.insert(
        HeaderName::from_bytes(name.as_bytes()).unwrap(),
        HeaderValue::from_str(value).unwrap(),
    );
    response
}

/// Hands out `idem-1`, `idem-2`, ...
#[derive(Default)]
pub struct SequentialTokens {
    issued: AtomicU32,
}

impl SequentialTokens {
    pub fn issued(&self) -> u32 {
        self.issued.load(Ordering::SeqCst)
    }
}

impl IdempotencyTokenProvider for SequentialTokens {
    fn next_token(&self) -> String {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        format!("idem-{n}")
    }
}

pub fn builder(transport: &Arc<MockTransport>) -> NimbusClientBuilder {
    NimbusClient::builder()
        .transport(transport.clone())
        .auth(Arc::new(StaticTokenProvider::new(TOKEN)))
}

pub fn client(transport: &Arc<MockTransport>) -> NimbusClient {
    builder(transport).build().unwrap()
}

pub fn header<'a>(request: &'a TransportRequest, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}
