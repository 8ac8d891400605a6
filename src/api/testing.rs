//! Scripted transport shared by unit tests.

use crate::api::transport::{RawResponse, Transport};
use crate::error::{EanSearchError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// A request observed by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: String,
    pub timeout: Duration,
    pub at: Instant,
}

/// Transport that replays queued responses and records every call.
///
/// Once the queue is drained the last scripted response is repeated.
pub struct MockTransport {
    responses: Mutex<VecDeque<Option<RawResponse>>>,
    last: Mutex<Option<RawResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queues a successful response.
    pub fn respond(self, status: u16, body: &str) -> Self {
        self.respond_with_credits(status, body, None)
    }

    /// Queues a successful response carrying a credits header.
    pub fn respond_with_credits(self, status: u16, body: &str, credits: Option<i64>) -> Self {
        let response =
            RawResponse { status, credits_remaining: credits, body: body.to_string() };
        self.responses.lock().unwrap().push_back(Some(response));
        self
    }

    /// Queues a transport failure.
    pub fn fail(self) -> Self {
        self.responses.lock().unwrap().push_back(None);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: url.to_string(),
            timeout,
            at: Instant::now(),
        });

        let next = self.responses.lock().unwrap().pop_front();
        let response = match next {
            Some(scripted) => {
                *self.last.lock().unwrap() = scripted.clone();
                scripted
            }
            None => self.last.lock().unwrap().clone(),
        };

        response.ok_or_else(|| EanSearchError::Transport("connection refused".to_string()))
    }
}

/// Wraps product bodies in the API's response envelope.
pub fn xml_products(products: &[&str]) -> String {
    let body: String =
        products.iter().map(|p| format!("<product>{}</product>", p)).collect();
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?><xmlresult>{}</xmlresult>", body)
}
