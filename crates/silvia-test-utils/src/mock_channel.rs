// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound messages,
//! captured outbound messages, and a table of resolvable voice files.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use silvia_core::traits::adapter::PluginAdapter;
use silvia_core::traits::channel::ChannelAdapter;
use silvia_core::types::{
    AdapterType, ConversationId, HealthStatus, InboundMessage, MessageContent, MessageId,
    OutboundMessage, VoiceResource,
};
use silvia_core::SilviaError;

/// Builds an inbound message for `conversation_id` with the given content.
pub fn inbound(conversation_id: &str, content: MessageContent) -> InboundMessage {
    InboundMessage {
        id: format!("test-{}", uuid::Uuid::new_v4()),
        conversation_id: ConversationId::from(conversation_id),
        sender_id: "test-user".to_string(),
        channel: "mock".to_string(),
        content,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

/// A mock messaging channel for testing.
///
/// - **inbound**: messages injected via `inject_message()` are returned by `receive()`
/// - **sent**: messages passed to `send()` are captured for `sent_messages()`
/// - **voice**: files registered via `add_voice_file()` are returned by `resolve_voice()`
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundMessage>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    voice_files: Arc<Mutex<HashMap<String, VoiceResource>>>,
    notify: Arc<Notify>,
    closed: AtomicBool,
    fail_sends: AtomicBool,
    receive_failures: AtomicUsize,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            voice_files: Arc::new(Mutex::new(HashMap::new())),
            notify: Arc::new(Notify::new()),
            closed: AtomicBool::new(false),
            fail_sends: AtomicBool::new(false),
            receive_failures: AtomicUsize::new(0),
        }
    }

    /// Inject an inbound message into the receive queue.
    pub async fn inject_message(&self, msg: InboundMessage) {
        self.inbound.lock().await.push_back(msg);
        self.notify.notify_one();
    }

    /// Make `receive()` return `ChannelClosed` once the queue is empty.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Make the next `count` calls to `receive()` fail with a transport error.
    pub fn fail_next_receives(&self, count: usize) {
        self.receive_failures.store(count, Ordering::SeqCst);
    }

    /// Make every subsequent `send()` fail with a channel error.
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Register a voice file returned by `resolve_voice(file_id)`.
    pub async fn add_voice_file(&self, file_id: &str, path: &str, download_url: &str) {
        self.voice_files.lock().await.insert(
            file_id.to_string(),
            VoiceResource {
                path: path.to_string(),
                download_url: download_url.to_string(),
            },
        );
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Contents of the messages sent to `conversation_id`, in order.
    pub async fn sent_to(&self, conversation_id: &str) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.conversation_id.as_str() == conversation_id)
            .map(|m| m.content.clone())
            .collect()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, SilviaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SilviaError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), SilviaError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, SilviaError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(SilviaError::Channel {
                message: "mock send failure".into(),
                source: None,
            });
        }
        let id = format!("mock-msg-{}", uuid::Uuid::new_v4());
        self.sent.lock().await.push(msg);
        Ok(MessageId(id))
    }

    async fn receive(&self) -> Result<InboundMessage, SilviaError> {
        if self
            .receive_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(SilviaError::Channel {
                message: "mock receive failure".into(),
                source: None,
            });
        }
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(msg) = queue.pop_front() {
                    return Ok(msg);
                }
            }
            if self.closed.load(Ordering::SeqCst) {
                return Err(SilviaError::ChannelClosed("mock inbound".into()));
            }
            self.notify.notified().await;
        }
    }

    async fn resolve_voice(&self, file_id: &str) -> Result<VoiceResource, SilviaError> {
        self.voice_files
            .lock()
            .await
            .get(file_id)
            .cloned()
            .ok_or_else(|| SilviaError::Channel {
                message: format!("unknown voice file `{file_id}`"),
                source: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn receive_returns_injected_messages() {
        let channel = MockChannel::new();
        channel
            .inject_message(inbound("42", MessageContent::Text("hola".into())))
            .await;

        let received = channel.receive().await.unwrap();
        assert_eq!(received.conversation_id.as_str(), "42");
        assert_eq!(received.content, MessageContent::Text("hola".into()));
    }

    #[tokio::test]
    async fn send_captures_outbound_messages() {
        let channel = MockChannel::new();
        channel
            .send(OutboundMessage::text("42".into(), "respuesta"))
            .await
            .unwrap();
        channel
            .send(OutboundMessage::text("7".into(), "otra"))
            .await
            .unwrap();

        assert_eq!(channel.sent_count().await, 2);
        assert_eq!(channel.sent_to("42").await, vec!["respuesta".to_string()]);
    }

    #[tokio::test]
    async fn closed_channel_drains_queue_then_errors() {
        let channel = MockChannel::new();
        channel
            .inject_message(inbound("1", MessageContent::Unsupported))
            .await;
        channel.close();

        assert!(channel.receive().await.is_ok());
        let err = channel.receive().await.unwrap_err();
        assert!(matches!(err, SilviaError::ChannelClosed(_)));
    }

    #[tokio::test]
    async fn receive_failures_are_counted_down() {
        let channel = MockChannel::new();
        channel.fail_next_receives(2);
        channel
            .inject_message(inbound("1", MessageContent::Unsupported))
            .await;

        for _ in 0..2 {
            let err = channel.receive().await.unwrap_err();
            assert!(matches!(err, SilviaError::Channel { .. }));
        }
        assert!(channel.receive().await.is_ok());
    }

    #[tokio::test]
    async fn failing_sends_are_not_captured() {
        let channel = MockChannel::new();
        channel.fail_sends(true);
        assert!(channel
            .send(OutboundMessage::text("1".into(), "x"))
            .await
            .is_err());
        assert_eq!(channel.sent_count().await, 0);
    }

    #[tokio::test]
    async fn resolves_registered_voice_files() {
        let channel = MockChannel::new();
        channel
            .add_voice_file("abc", "voice/file_1.ogg", "http://localhost/file_1.ogg")
            .await;

        let resource = channel.resolve_voice("abc").await.unwrap();
        assert_eq!(resource.path, "voice/file_1.ogg");
        assert!(channel.resolve_voice("missing").await.is_err());
    }
}
