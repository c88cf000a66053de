// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI chat completions provider for the SilvIA bot.
//!
//! Implements [`ProviderAdapter`]: the conversation's turns are submitted in
//! order and the first choice's text is returned.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use silvia_config::model::OpenAiConfig;
use silvia_core::error::SilviaError;
use silvia_core::traits::{PluginAdapter, ProviderAdapter};
use silvia_core::types::{AdapterType, CompletionRequest, CompletionResponse, HealthStatus};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatMessage, ChatRequest};

/// OpenAI provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiProvider {
    client: OpenAiClient,
    model: String,
}

impl OpenAiProvider {
    pub fn new(config: &OpenAiConfig) -> Result<Self, SilviaError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(model = config.model, "OpenAI provider initialized");

        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }

    /// Default model, used when a request leaves `model` empty.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_chat_request(&self, request: &CompletionRequest) -> ChatRequest {
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };
        ChatRequest {
            model,
            messages: request.messages.iter().map(ChatMessage::from).collect(),
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, SilviaError> {
        // No token-consuming request.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SilviaError> {
        debug!("OpenAI provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, SilviaError> {
        let chat_request = self.to_chat_request(&request);
        debug!(
            model = chat_request.model,
            turns = chat_request.messages.len(),
            "sending completion request"
        );

        let response = self.client.chat(&chat_request).await?;
        let content = response.first_text().ok_or_else(|| SilviaError::Provider {
            message: "completion contained no text".into(),
            source: None,
        })?;

        Ok(CompletionResponse {
            content,
            model: response.model,
        })
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Result<String, SilviaError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("OPENAI_API_KEY").map_err(|_| {
        SilviaError::Config(
            "OpenAI API key not found. Set openai.api_key in config or OPENAI_API_KEY environment variable.".into(),
        )
    })
}
