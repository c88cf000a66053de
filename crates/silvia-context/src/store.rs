// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded in-memory conversation store.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use silvia_config::model::HistoryConfig;
use silvia_core::traits::ConversationStore;
use silvia_core::types::{ConversationId, Turn};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

struct Conversation {
    turns: VecDeque<Turn>,
    last_touched: Instant,
}

/// Conversation log held in process memory.
///
/// Limits:
/// - at most `max_turns` turns per conversation (oldest dropped first)
/// - at most `max_conversations` live conversations (least recently touched
///   evicted when a new one is created)
/// - conversations idle longer than `idle_ttl` read as empty and are discarded
pub struct InMemoryConversationStore {
    conversations: Mutex<HashMap<ConversationId, Conversation>>,
    max_turns: usize,
    max_conversations: usize,
    idle_ttl: Duration,
}

impl InMemoryConversationStore {
    pub fn new(max_turns: usize, max_conversations: usize, idle_ttl: Duration) -> Self {
        Self {
            conversations: Mutex::new(HashMap::new()),
            max_turns: max_turns.max(1),
            max_conversations: max_conversations.max(1),
            idle_ttl,
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(
            config.max_turns_per_conversation,
            config.max_conversations,
            Duration::from_secs(config.idle_ttl_secs),
        )
    }

    /// Number of live (non-expired) conversations.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let conversations = self.conversations.lock().await;
        conversations
            .values()
            .filter(|c| !self.is_expired(c, now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn is_expired(&self, conversation: &Conversation, now: Instant) -> bool {
        now.duration_since(conversation.last_touched) > self.idle_ttl
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::from_config(&HistoryConfig::default())
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append(&self, id: &ConversationId, turn: Turn) {
        let now = Instant::now();
        let mut conversations = self.conversations.lock().await;

        if !conversations.contains_key(id) {
            conversations.retain(|_, c| now.duration_since(c.last_touched) <= self.idle_ttl);

            if conversations.len() >= self.max_conversations
                && let Some(oldest) = conversations
                    .iter()
                    .min_by_key(|(_, c)| c.last_touched)
                    .map(|(k, _)| k.clone())
            {
                debug!(conversation_id = %oldest, "evicting least recently used conversation");
                conversations.remove(&oldest);
            }
        }

        let conversation = conversations
            .entry(id.clone())
            .or_insert_with(|| Conversation {
                turns: VecDeque::new(),
                last_touched: now,
            });

        if self.is_expired(conversation, now) {
            conversation.turns.clear();
        }

        conversation.turns.push_back(turn);
        while conversation.turns.len() > self.max_turns {
            conversation.turns.pop_front();
        }
        conversation.last_touched = now;
    }

    async fn get(&self, id: &ConversationId) -> Vec<Turn> {
        let now = Instant::now();
        let mut conversations = self.conversations.lock().await;

        let expired = match conversations.get(id) {
            Some(c) => self.is_expired(c, now),
            None => return Vec::new(),
        };
        if expired {
            conversations.remove(id);
            return Vec::new();
        }

        conversations
            .get(id)
            .map(|c| c.turns.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn clear(&self, id: &ConversationId) {
        self.conversations.lock().await.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ConversationId {
        ConversationId::from(s)
    }

    #[tokio::test]
    async fn unknown_conversation_is_empty() {
        let store = InMemoryConversationStore::default();
        assert!(store.get(&id("nobody")).await.is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn append_preserves_order() {
        let store = InMemoryConversationStore::default();
        let chat = id("1");
        store.append(&chat, Turn::user("hola")).await;
        store.append(&chat, Turn::assistant("¡Hola!")).await;
        store.append(&chat, Turn::user("¿qué tal?")).await;

        let turns = store.get(&chat).await;
        let contents: Vec<&str> = turns.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["hola", "¡Hola!", "¿qué tal?"]);
    }

    #[tokio::test]
    async fn conversations_are_isolated() {
        let store = InMemoryConversationStore::default();
        store.append(&id("a"), Turn::user("uno")).await;
        store.append(&id("b"), Turn::user("dos")).await;
        assert_eq!(store.get(&id("a")).await, vec![Turn::user("uno")]);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn clear_discards_conversation() {
        let store = InMemoryConversationStore::default();
        store.append(&id("a"), Turn::user("uno")).await;
        store.clear(&id("a")).await;
        assert!(store.get(&id("a")).await.is_empty());
        // Clearing an unknown id is a no-op.
        store.clear(&id("zzz")).await;
    }

    #[tokio::test]
    async fn oldest_turns_are_dropped_past_cap() {
        let store = InMemoryConversationStore::new(2, 10, Duration::from_secs(60));
        let chat = id("1");
        for text in ["a", "b", "c"] {
            store.append(&chat, Turn::user(text)).await;
        }
        assert_eq!(store.get(&chat).await, vec![Turn::user("b"), Turn::user("c")]);
    }

    #[tokio::test(start_paused = true)]
    async fn least_recently_touched_conversation_is_evicted() {
        let store = InMemoryConversationStore::new(10, 2, Duration::from_secs(600));
        store.append(&id("a"), Turn::user("1")).await;
        tokio::time::advance(Duration::from_secs(1)).await;
        store.append(&id("b"), Turn::user("2")).await;
        tokio::time::advance(Duration::from_secs(1)).await;
        store.append(&id("a"), Turn::user("3")).await;
        tokio::time::advance(Duration::from_secs(1)).await;
        store.append(&id("c"), Turn::user("4")).await;

        assert!(store.get(&id("b")).await.is_empty());
        assert_eq!(store.get(&id("a")).await.len(), 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_conversations_expire() {
        let store = InMemoryConversationStore::new(10, 10, Duration::from_secs(30));
        let chat = id("1");
        store.append(&chat, Turn::user("hola")).await;

        tokio::time::advance(Duration::from_secs(20)).await;
        assert_eq!(store.get(&chat).await.len(), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(store.get(&chat).await.is_empty());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn append_after_expiry_starts_fresh() {
        let store = InMemoryConversationStore::new(10, 10, Duration::from_secs(30));
        let chat = id("1");
        store.append(&chat, Turn::user("viejo")).await;
        tokio::time::advance(Duration::from_secs(60)).await;
        store.append(&chat, Turn::user("nuevo")).await;
        assert_eq!(store.get(&chat).await, vec![Turn::user("nuevo")]);
    }
}
