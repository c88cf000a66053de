// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured responses,
//! enabling fast tests without external API calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use silvia_core::traits::adapter::PluginAdapter;
use silvia_core::traits::provider::ProviderAdapter;
use silvia_core::types::{AdapterType, CompletionRequest, CompletionResponse, HealthStatus};
use silvia_core::SilviaError;

/// A mock LLM provider that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned. In failing mode every call
/// returns a provider error.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    calls: AtomicUsize,
    failing: AtomicBool,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            delay: None,
        }
    }

    /// Create a mock provider pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        let mut provider = Self::new();
        provider.responses = Arc::new(Mutex::new(VecDeque::from(responses)));
        provider
    }

    /// Create a mock provider whose every call fails.
    pub fn failing() -> Self {
        let provider = Self::new();
        provider.failing.store(true, Ordering::SeqCst);
        provider
    }

    /// Make every call wait `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(text);
    }

    /// Number of `complete()` calls so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_response(&self) -> String {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, SilviaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SilviaError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, SilviaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let model = request.model.clone();
        self.requests.lock().await.push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(SilviaError::Provider {
                message: "mock provider failure".into(),
                source: None,
            });
        }

        Ok(CompletionResponse {
            content: self.next_response().await,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silvia_core::types::Turn;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-3.5-turbo".into(),
            messages: vec![Turn::user("hola")],
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn returns_queued_then_default_responses() {
        let provider = MockProvider::with_responses(vec!["primera".into()]);

        let first = provider.complete(request()).await.unwrap();
        assert_eq!(first.content, "primera");
        assert_eq!(first.model, "gpt-3.5-turbo");

        let second = provider.complete(request()).await.unwrap();
        assert_eq!(second.content, "mock response");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_provider_waits_before_answering() {
        let provider = MockProvider::new().with_delay(Duration::from_millis(100));
        let started = tokio::time::Instant::now();

        provider.complete(request()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn failing_provider_counts_calls() {
        let provider = MockProvider::failing();
        assert!(provider.complete(request()).await.is_err());
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.requests().await.len(), 1);
    }
}
