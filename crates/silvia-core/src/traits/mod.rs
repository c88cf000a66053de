// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! External capability adapters extend the [`PluginAdapter`] base trait and
//! use `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod channel;
pub mod conversation;
pub mod knowledge;
pub mod preferences;
pub mod provider;
pub mod transcription;

pub use adapter::PluginAdapter;
pub use channel::ChannelAdapter;
pub use conversation::{ConversationStore, ResponseCache};
pub use knowledge::KnowledgeAdapter;
pub use preferences::PreferenceStore;
pub use provider::ProviderAdapter;
pub use transcription::TranscriptionAdapter;
