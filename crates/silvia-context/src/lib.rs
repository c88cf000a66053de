// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Short-lived conversation state for the SilvIA dispatcher.
//!
//! - [`InMemoryConversationStore`]: ordered turn log per conversation, capped
//!   in turns, in live conversations, and by idle time
//! - [`InMemoryResponseCache`]: LRU + TTL memo of LLM replies
//! - [`context_key`]: order-sensitive fingerprint of a turn sequence
//!
//! Nothing here survives a restart.

pub mod cache;
pub mod fingerprint;
pub mod store;

pub use cache::InMemoryResponseCache;
pub use fingerprint::context_key;
pub use store::InMemoryConversationStore;
