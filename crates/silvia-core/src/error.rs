// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the SilvIA bot.

use thiserror::Error;

/// Boxed error source carried by adapter failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across all adapter traits and the dispatcher.
#[derive(Debug, Error)]
pub enum SilviaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Preference store errors. Soft: the dispatcher falls back to defaults.
    #[error("storage error: {source}")]
    Storage { source: BoxError },

    /// Chat transport errors (connection failure, send failure, file lookup).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<BoxError>,
    },

    /// The inbound side of the chat transport is closed; no further messages will arrive.
    #[error("channel closed: {0}")]
    ChannelClosed(String),

    /// LLM call failures (network, auth, rate limit, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<BoxError>,
    },

    /// Knowledge fallback lookup failures.
    #[error("knowledge lookup error: {message}")]
    Knowledge {
        message: String,
        source: Option<BoxError>,
    },

    /// Inbound message carried neither text nor voice.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Voice attachment resolved to a container the pipeline does not accept.
    #[error("unsupported audio format: {path}")]
    UnsupportedFormat { path: String },

    /// Voice attachment could not be fetched or written to disk.
    #[error("download error: {message}")]
    Download {
        message: String,
        source: Option<BoxError>,
    },

    /// Transcription service rejected or could not find its credentials.
    #[error("transcription credentials unavailable: {0}")]
    TranscriptionCredential(String),

    /// Any other transcription failure.
    #[error("transcription error: {message}")]
    Transcription {
        message: String,
        source: Option<BoxError>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SilviaError {
    /// Whether this error belongs to the voice pipeline taxonomy.
    pub fn is_voice_error(&self) -> bool {
        matches!(
            self,
            SilviaError::UnsupportedFormat { .. }
                | SilviaError::Download { .. }
                | SilviaError::TranscriptionCredential(_)
                | SilviaError::Transcription { .. }
        )
    }
}
