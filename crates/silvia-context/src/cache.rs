// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LRU + TTL response cache.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use silvia_config::model::CacheConfig;
use silvia_core::traits::ResponseCache;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

struct Entry {
    reply: String,
    stored_at: Instant,
    /// Monotonic use counter; the smallest value is the least recently used.
    last_used: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, Entry>,
    tick: u64,
}

impl CacheState {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// Memo of LLM replies keyed by [`context_key`](crate::context_key).
pub struct InMemoryResponseCache {
    state: Mutex<CacheState>,
    max_entries: usize,
    ttl: Duration,
}

impl InMemoryResponseCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            max_entries: max_entries.max(1),
            ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_entries, Duration::from_secs(config.ttl_secs))
    }

    /// Number of stored entries, expired ones included until they are touched.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryResponseCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

#[async_trait]
impl ResponseCache for InMemoryResponseCache {
    async fn lookup(&self, key: &str) -> Option<String> {
        let mut state = self.state.lock().await;
        let tick = state.next_tick();

        let expired = match state.entries.get_mut(key) {
            None => return None,
            Some(entry) if entry.stored_at.elapsed() > self.ttl => true,
            Some(entry) => {
                entry.last_used = tick;
                return Some(entry.reply.clone());
            }
        };

        if expired {
            trace!(key, "dropping expired cache entry");
            state.entries.remove(key);
        }
        None
    }

    async fn store(&self, key: String, reply: String) {
        let mut state = self.state.lock().await;
        let tick = state.next_tick();

        if !state.entries.contains_key(&key) && state.entries.len() >= self.max_entries {
            let ttl = self.ttl;
            state.entries.retain(|_, e| e.stored_at.elapsed() <= ttl);

            if state.entries.len() >= self.max_entries
                && let Some(lru) = state
                    .entries
                    .iter()
                    .min_by_key(|(_, e)| e.last_used)
                    .map(|(k, _)| k.clone())
            {
                trace!(key = %lru, "evicting least recently used cache entry");
                state.entries.remove(&lru);
            }
        }

        state.entries.insert(
            key,
            Entry {
                reply,
                stored_at: Instant::now(),
                last_used: tick,
            },
        );
    }
}
