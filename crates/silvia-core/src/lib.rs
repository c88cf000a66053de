// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the SilvIA bot.
//!
//! This crate provides the trait definitions, error types, and common types
//! shared by the dispatcher and every adapter crate in the workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SilviaError;
pub use types::{AdapterType, ConversationId, HealthStatus, MessageId, Role, Turn};

pub use traits::{
    ChannelAdapter, ConversationStore, KnowledgeAdapter, PluginAdapter, PreferenceStore,
    ProviderAdapter, ResponseCache, TranscriptionAdapter,
};
