// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for messaging platform integrations.

use async_trait::async_trait;

use crate::error::SilviaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundMessage, MessageId, OutboundMessage, VoiceResource};

/// Adapter for bidirectional messaging channel integrations.
///
/// Channel adapters connect the bot to an external messaging platform,
/// handling message ingestion, delivery, and attachment lookup.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), SilviaError>;

    /// Sends a message through the channel.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, SilviaError>;

    /// Receives the next inbound message from the channel.
    async fn receive(&self) -> Result<InboundMessage, SilviaError>;

    /// Resolves a voice attachment to its transport path and download URL.
    async fn resolve_voice(&self, file_id: &str) -> Result<VoiceResource, SilviaError>;
}
