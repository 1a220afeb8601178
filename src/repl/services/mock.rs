//! # Mock Transport for Testing
//!
//! Replays scripted responses in order and records every request it was
//! asked to execute.

use super::http::{HttpRequest, HttpResponse, Transport};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Script = Arc<Mutex<VecDeque<Result<HttpResponse, String>>>>;
type RequestLog = Arc<Mutex<Vec<HttpRequest>>>;

/// Scripted transport; clones share the same script and log
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    script: Script,
    requests: RequestLog,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next request
    pub fn push_response(&self, response: HttpResponse) {
        lock(&self.script).push_back(Ok(response));
    }

    /// Queue a transport failure for the next request
    pub fn push_failure(&self, message: &str) {
        lock(&self.script).push_back(Err(message.to_string()));
    }

    /// Requests executed so far, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        lock(&self.requests).push(request.clone());
        match lock(&self.script).pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Err(anyhow::anyhow!("no scripted response for {} {}", request.method, request.url)),
        }
    }
}

/// Recordings stay readable after a panicking test thread
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

