// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for SilvIA integration tests.
//!
//! Provides mock adapters for fast, deterministic tests without Telegram,
//! OpenAI, Google, or Wikipedia.
//!
//! # Components
//!
//! - [`MockChannel`] - message injection, sent-message capture, voice files
//! - [`MockProvider`] - scripted LLM replies or failures, call counting
//! - [`MockTranscriber`], [`MockKnowledge`], [`MockPreferences`] - the
//!   remaining capabilities

pub mod mock_channel;
pub mod mock_provider;
pub mod mock_services;

pub use mock_channel::{inbound, MockChannel};
pub use mock_provider::MockProvider;
pub use mock_services::{MockKnowledge, MockPreferences, MockTranscriber, TranscriptOutcome};
