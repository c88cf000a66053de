// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM chat completion APIs.

use async_trait::async_trait;

use crate::error::SilviaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

/// Adapter for LLM provider integrations.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends the ordered turn sequence and returns the full reply.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, SilviaError>;
}
