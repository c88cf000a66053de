// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge adapter trait, the secondary lookup used when the LLM is unavailable.

use async_trait::async_trait;

use crate::error::SilviaError;
use crate::traits::adapter::PluginAdapter;

#[async_trait]
pub trait KnowledgeAdapter: PluginAdapter {
    /// Returns a short summary for `query`, or `None` when nothing matches.
    async fn summarize(&self, query: &str) -> Result<Option<String>, SilviaError>;
}
