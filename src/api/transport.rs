//! HTTP transport for API requests.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use wreq::Client;

/// Response header carrying the caller's remaining API credits.
pub const CREDITS_HEADER: &str = "X-Credits-Remaining";

/// What the client needs from an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed `X-Credits-Remaining` header, if present and numeric
    pub credits_remaining: Option<i64>,
    /// Response body
    pub body: String,
}

/// Trait for issuing GET requests - enables mocking for tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a GET request bounded by `timeout`.
    ///
    /// Non-success statuses are returned as responses, not errors.
    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse>;
}

/// Production transport backed by wreq.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport, optionally routed through a proxy.
    pub fn new(proxy: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder().gzip(true);

        if let Some(proxy_url) = proxy {
            debug!("Configuring proxy: {}", proxy_url);
            builder = builder.proxy(wreq::Proxy::all(proxy_url)?);
        }

        Ok(Self { client: builder.build()? })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header("Accept", "application/xml")
            .send()
            .await?;

        let status = response.status().as_u16();
        let credits_remaining = response
            .headers()
            .get(CREDITS_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());

        debug!("Response status: {} (credits: {:?})", status, credits_remaining);

        let body = response.text().await?;

        Ok(RawResponse { status, credits_remaining, body })
    }
}
