// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice note pipeline: resolve, download, transcribe.
//!
//! The audio is streamed into a [`NamedTempFile`] that is deleted when it
//! goes out of scope, so no path through [`VoicePipeline::transcribe`]
//! leaves a file behind.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use silvia_core::types::{TranscriptionConfig, TranscriptionRequest, VoiceResource};
use silvia_core::{ChannelAdapter, SilviaError, TranscriptionAdapter};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::bounded;

pub struct VoicePipeline {
    channel: Arc<dyn ChannelAdapter>,
    transcriber: Arc<dyn TranscriptionAdapter>,
    http: reqwest::Client,
    accepted_extensions: Vec<String>,
    config: TranscriptionConfig,
    timeout: Duration,
    temp_dir: Option<PathBuf>,
}

impl VoicePipeline {
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        transcriber: Arc<dyn TranscriptionAdapter>,
        accepted_extensions: Vec<String>,
        config: TranscriptionConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            channel,
            transcriber,
            http: reqwest::Client::new(),
            accepted_extensions,
            config,
            timeout,
            temp_dir: None,
        }
    }

    /// Downloads into `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Transcribes the voice note `file_id`, joining segments with newlines.
    pub async fn transcribe(&self, file_id: &str) -> Result<String, SilviaError> {
        let resource = bounded(self.timeout, self.channel.resolve_voice(file_id)).await?;
        self.check_format(&resource)?;

        let temp = bounded(self.timeout, self.download(&resource)).await?;
        let audio = tokio::fs::read(temp.path())
            .await
            .map_err(|e| download_error("failed to read downloaded audio", e))?;
        debug!(
            path = resource.path.as_str(),
            bytes = audio.len(),
            "voice note downloaded"
        );

        let request = TranscriptionRequest {
            audio,
            config: self.config.clone(),
        };
        let segments = bounded(self.timeout, self.transcriber.transcribe(request)).await?;
        Ok(segments.join("\n"))
    }

    fn check_format(&self, resource: &VoiceResource) -> Result<(), SilviaError> {
        if has_accepted_extension(&resource.path, &self.accepted_extensions) {
            Ok(())
        } else {
            Err(SilviaError::UnsupportedFormat {
                path: resource.path.clone(),
            })
        }
    }

    async fn download(&self, resource: &VoiceResource) -> Result<NamedTempFile, SilviaError> {
        let suffix = Path::new(&resource.path)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let mut builder = tempfile::Builder::new();
        builder.prefix("silvia-voice-").suffix(&suffix);
        let temp = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| download_error("failed to create temp file", e))?;

        let response = self
            .http
            .get(&resource.download_url)
            .send()
            .await
            .map_err(|e| download_error("voice download request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SilviaError::Download {
                message: format!("voice download returned HTTP {status}"),
                source: None,
            });
        }

        let file = temp
            .reopen()
            .map_err(|e| download_error("failed to open temp file", e))?;
        let mut file = tokio::fs::File::from_std(file);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| download_error("voice download interrupted", e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| download_error("failed to write temp file", e))?;
        }
        file.flush()
            .await
            .map_err(|e| download_error("failed to flush temp file", e))?;

        Ok(temp)
    }
}

/// Whether `path` ends with one of `accepted` (case-insensitive).
pub fn has_accepted_extension(path: &str, accepted: &[String]) -> bool {
    let path = path.to_lowercase();
    accepted
        .iter()
        .any(|ext| path.ends_with(&ext.to_lowercase()))
}

fn download_error(
    message: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> SilviaError {
    SilviaError::Download {
        message: message.to_string(),
        source: Some(Box::new(source)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted() -> Vec<String> {
        vec![".ogg".to_string(), ".oga".to_string()]
    }

    #[test]
    fn accepts_configured_extensions() {
        assert!(has_accepted_extension("voice/file_1.ogg", &accepted()));
        assert!(has_accepted_extension("voice/file_2.OGA", &accepted()));
    }

    #[test]
    fn rejects_other_containers() {
        assert!(!has_accepted_extension("voice/file_1.mp3", &accepted()));
        assert!(!has_accepted_extension("voice/ogg", &accepted()));
        assert!(!has_accepted_extension("voice/file.ogg.mp3", &accepted()));
    }
}
