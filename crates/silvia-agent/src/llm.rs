// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache-first LLM reply strategy.
//!
//! The conversation so far is fingerprinted with [`context_key`]. A cache
//! hit is returned without touching the provider; a miss calls the provider
//! under the dispatcher's call timeout and records the reply before
//! returning it. Provider failures are logged and reported as "no reply" so
//! the caller can fall back.

use std::sync::Arc;
use std::time::Duration;

use silvia_context::context_key;
use silvia_core::types::{CompletionRequest, Turn};
use silvia_core::{ProviderAdapter, ResponseCache};
use tracing::{debug, warn};

use crate::bounded;

pub struct LlmStrategy {
    provider: Arc<dyn ProviderAdapter>,
    cache: Arc<dyn ResponseCache>,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl LlmStrategy {
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        cache: Arc<dyn ResponseCache>,
        model: String,
        temperature: f32,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            model,
            temperature,
            timeout,
        }
    }

    /// Returns a reply for `turns`, or `None` when the provider failed.
    pub async fn reply(&self, turns: &[Turn]) -> Option<String> {
        let key = context_key(turns);

        if let Some(cached) = self.cache.lookup(&key).await {
            debug!(key = key.as_str(), "response cache hit");
            return Some(cached);
        }

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: turns.to_vec(),
            temperature: self.temperature,
        };

        match bounded(self.timeout, self.provider.complete(request)).await {
            Ok(response) => {
                debug!(model = response.model.as_str(), "provider reply received");
                self.cache.store(key, response.content.clone()).await;
                Some(response.content)
            }
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "completion failed"
                );
                None
            }
        }
    }
}
