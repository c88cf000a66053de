// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcription adapter trait for speech-to-text services.

use async_trait::async_trait;

use crate::error::SilviaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::TranscriptionRequest;

/// Adapter for speech-to-text services.
///
/// Implementations report missing or rejected credentials as
/// [`SilviaError::TranscriptionCredential`] and every other failure as
/// [`SilviaError::Transcription`].
#[async_trait]
pub trait TranscriptionAdapter: PluginAdapter {
    /// Transcribes audio, returning the recognized segments in order.
    async fn transcribe(&self, request: TranscriptionRequest)
        -> Result<Vec<String>, SilviaError>;
}
