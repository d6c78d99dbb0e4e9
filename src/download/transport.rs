// src/download/transport.rs
// =============================================================================
// The network capability the image downloader depends on.
//
// The downloader never talks to reqwest directly. It asks a Transport for a
// URL and gets back a future resolving to the body plus the declared
// Content-Type. This keeps the downloader testable with a mock and lets
// embedders bring their own HTTP stack (proxies, caching, ...).
//
// Rust concepts:
// - Trait objects: Arc<dyn Transport> is shared across tasks
// - BoxFuture: a heap-allocated, Send future, so the trait stays object safe
// =============================================================================

use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;

use crate::config::Config;
use crate::error::TransportError;

/// What the downloader needs to know about a finished response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// The raw Content-Type header value, if any
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn from_parts(headers: &HeaderMap, body: Bytes) -> Self {
        TransportResponse {
            content_type: headers
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
            body,
        }
    }
}

/// Issues one fetch per call. Implementations decide on timeouts/retries.
pub trait Transport: Send + Sync {
    /// Creates the transfer for `url`. Nothing is sent until the returned
    /// future is polled.
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<TransportResponse, TransportError>>;
}

/// The default transport, backed by a shared reqwest Client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        ReqwestTransport { client }
    }

    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        Ok(ReqwestTransport::new(config.http_client()?))
    }
}

impl Transport for ReqwestTransport {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<TransportResponse, TransportError>> {
        let request = self.client.get(url);

        async move {
            let response = request.send().await?;
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok(TransportResponse::from_parts(&headers, body))
        }
        .boxed()
    }
}
