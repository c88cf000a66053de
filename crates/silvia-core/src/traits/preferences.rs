// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Preference store trait for per-conversation user settings.

use async_trait::async_trait;

use crate::error::SilviaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ConversationId;

/// Adapter for the persistent per-conversation preference table.
#[async_trait]
pub trait PreferenceStore: PluginAdapter {
    /// Initializes the backend (schema creation, connection setup).
    async fn initialize(&self) -> Result<(), SilviaError>;

    /// Returns the stored locale, or `None` if the conversation has none.
    async fn get_locale(&self, id: &ConversationId) -> Result<Option<String>, SilviaError>;

    /// Inserts or replaces the locale for a conversation.
    async fn set_locale(&self, id: &ConversationId, locale: &str) -> Result<(), SilviaError>;
}
