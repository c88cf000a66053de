// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation history and response cache traits.
//!
//! Both are process-local state owned by the dispatcher. They are traits so
//! bounded, evicting, or persistent implementations can be swapped in without
//! touching routing logic.

use async_trait::async_trait;

use crate::types::{ConversationId, Turn};

/// Per-conversation ordered message log.
///
/// All operations are total: unknown ids behave like empty conversations.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Appends a turn, creating the conversation if absent.
    async fn append(&self, id: &ConversationId, turn: Turn);

    /// Returns the full ordered sequence, empty if none.
    async fn get(&self, id: &ConversationId) -> Vec<Turn>;

    /// Discards the conversation.
    async fn clear(&self, id: &ConversationId);
}

/// Memo of LLM replies keyed by a context fingerprint.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Returns a previously stored reply for `key`.
    async fn lookup(&self, key: &str) -> Option<String>;

    /// Records `reply` under `key`.
    async fn store(&self, key: String, reply: String);
}
