// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the dispatcher.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opaque, platform-supplied identifier of one chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<i64> for ConversationId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// Unique identifier for a sent message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Provider,
    Transcription,
    Knowledge,
    Storage,
}

// --- Conversation types ---

/// Author of a turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a conversation's history.
///
/// Field order is part of the cache fingerprint; do not reorder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// --- Channel types ---

/// Content carried by an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// Plain text message.
    Text(String),
    /// Voice note, referenced by the transport's file id.
    Voice {
        file_id: String,
        duration_secs: Option<u32>,
    },
    /// Language picked from the inline keyboard offered by `/start`.
    LocaleSelection(String),
    /// Anything else (stickers, locations, empty updates).
    Unsupported,
}

/// An inbound message received from a channel adapter.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Transport-specific message id.
    pub id: String,
    /// Conversation the message belongs to; replies go back here.
    pub conversation_id: ConversationId,
    /// Sender user id, `"unknown"` when the transport does not provide one.
    pub sender_id: String,
    /// Name of the channel adapter that produced this message.
    pub channel: String,
    pub content: MessageContent,
    /// RFC 3339 timestamp.
    pub timestamp: String,
}

/// A button offered with an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyChoice {
    pub label: String,
    pub data: String,
}

/// An outbound message to be sent via a channel adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub conversation_id: ConversationId,
    pub content: String,
    /// Inline choices, one per row. Empty for plain messages.
    pub choices: Vec<ReplyChoice>,
}

impl OutboundMessage {
    pub fn text(conversation_id: ConversationId, content: impl Into<String>) -> Self {
        Self {
            conversation_id,
            content: content.into(),
            choices: Vec::new(),
        }
    }

    pub fn with_choices(mut self, choices: Vec<ReplyChoice>) -> Self {
        self.choices = choices;
        self
    }
}

/// A voice attachment resolved to a downloadable resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceResource {
    /// Transport-side path; its extension identifies the audio container.
    pub path: String,
    pub download_url: String,
}

// --- Provider types ---

/// A request to an LLM provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Turn>,
    pub temperature: f32,
}

/// A response from an LLM provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
}

// --- Transcription types ---

/// Fixed recognition settings submitted with every transcription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    pub encoding: String,
    pub sample_rate_hertz: u32,
    pub language_code: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            encoding: "OGG_OPUS".to_string(),
            sample_rate_hertz: 48_000,
            language_code: "es-ES".to_string(),
        }
    }
}

/// Audio submitted for transcription.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub audio: Vec<u8>,
    pub config: TranscriptionConfig,
}
