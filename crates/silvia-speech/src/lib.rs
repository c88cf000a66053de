// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Cloud Speech-to-Text adapter.
//!
//! Uses the synchronous `speech:recognize` REST endpoint with API key
//! authentication. Audio is sent inline as base64.

pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use silvia_config::model::SpeechConfig;
use silvia_core::error::SilviaError;
use silvia_core::traits::{PluginAdapter, TranscriptionAdapter};
use silvia_core::types::{AdapterType, HealthStatus, TranscriptionRequest};
use tracing::debug;

use crate::types::{RecognitionAudio, RecognitionConfig, RecognizeRequest, RecognizeResponse};

/// Google Speech-to-Text transcriber.
///
/// A missing API key is reported per call as
/// [`SilviaError::TranscriptionCredential`], so the bot still starts without one.
pub struct GoogleSpeech {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
}

impl std::fmt::Debug for GoogleSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSpeech")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GoogleSpeech {
    /// API key resolution order: config -> `GOOGLE_API_KEY` env var -> none.
    pub fn new(config: &SpeechConfig, timeout: Duration) -> Result<Self, SilviaError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty()))
            .map(SecretString::from);

        Self::with_key(api_key, config.base_url.clone(), timeout)
    }

    pub fn with_key(
        api_key: Option<SecretString>,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, SilviaError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SilviaError::Transcription {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&SecretString, SilviaError> {
        self.api_key.as_ref().ok_or_else(|| {
            SilviaError::TranscriptionCredential("Google Cloud API key not configured".into())
        })
    }
}

#[async_trait]
impl PluginAdapter for GoogleSpeech {
    fn name(&self) -> &str {
        "google-speech"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transcription
    }

    async fn health_check(&self) -> Result<HealthStatus, SilviaError> {
        if self.is_configured() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Degraded("no API key configured".into()))
        }
    }

    async fn shutdown(&self) -> Result<(), SilviaError> {
        Ok(())
    }
}

#[async_trait]
impl TranscriptionAdapter for GoogleSpeech {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<Vec<String>, SilviaError> {
        let api_key = self.api_key()?;

        let body = RecognizeRequest {
            config: RecognitionConfig {
                encoding: request.config.encoding,
                sample_rate_hertz: request.config.sample_rate_hertz,
                language_code: request.config.language_code,
            },
            audio: RecognitionAudio {
                content: base64::engine::general_purpose::STANDARD.encode(&request.audio),
            },
        };

        let url = reqwest::Url::parse_with_params(
            &self.base_url,
            &[("key", api_key.expose_secret())],
        )
        .map_err(|e| SilviaError::Transcription {
            message: format!("invalid recognizer URL {}: {e}", self.base_url),
            source: Some(Box::new(e)),
        })?;

        debug!(bytes = request.audio.len(), "sending recognition request");

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SilviaError::Transcription {
                message: format!("recognition request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            let body = response.text().await.unwrap_or_default();
            return Err(SilviaError::TranscriptionCredential(format!(
                "recognizer rejected credentials ({status}): {body}"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SilviaError::Transcription {
                message: format!("recognizer returned {status}: {body}"),
                source: None,
            });
        }

        let parsed: RecognizeResponse =
            response.json().await.map_err(|e| SilviaError::Transcription {
                message: format!("failed to parse recognition response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let segments = parsed.segments();
        debug!(segments = segments.len(), "recognition finished");
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silvia_core::types::TranscriptionConfig;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn speech_for(server: &MockServer, key: Option<&str>) -> GoogleSpeech {
        GoogleSpeech::with_key(
            key.map(|k| SecretString::from(k.to_string())),
            format!("{}/v1/speech:recognize", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn request() -> TranscriptionRequest {
        TranscriptionRequest {
            audio: b"OggS fake".to_vec(),
            config: TranscriptionConfig::default(),
        }
    }

    #[tokio::test]
    async fn sends_fixed_config_and_joins_first_alternatives() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/speech:recognize"))
            .and(query_param("key", "g-key"))
            .and(body_partial_json(serde_json::json!({
                "config": {
                    "encoding": "OGG_OPUS",
                    "sampleRateHertz": 48000,
                    "languageCode": "es-ES"
                },
                "audio": {"content": "T2dnUyBmYWtl"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"alternatives": [{"transcript": "hola", "confidence": 0.9},
                                      {"transcript": "ola"}]},
                    {"alternatives": [{"transcript": "qué tal"}]}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let segments = speech_for(&server, Some("g-key"))
            .transcribe(request())
            .await
            .unwrap();
        assert_eq!(segments, vec!["hola", "qué tal"]);
    }

    #[tokio::test]
    async fn missing_key_is_credential_error_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = speech_for(&server, None).transcribe(request()).await.unwrap_err();
        assert!(matches!(err, SilviaError::TranscriptionCredential(_)));
    }

    #[tokio::test]
    async fn forbidden_is_credential_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = speech_for(&server, Some("bad")).transcribe(request()).await.unwrap_err();
        assert!(matches!(err, SilviaError::TranscriptionCredential(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn server_error_is_generic_transcription_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = speech_for(&server, Some("g-key")).transcribe(request()).await.unwrap_err();
        assert!(matches!(err, SilviaError::Transcription { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn no_results_yields_no_segments() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let segments = speech_for(&server, Some("g-key")).transcribe(request()).await.unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn debug_redacts_api_key() {
        let speech = GoogleSpeech::with_key(
            Some(SecretString::from("super-secret".to_string())),
            "http://localhost".into(),
            Duration::from_secs(1),
        )
        .unwrap();
        let out = format!("{speech:?}");
        assert!(out.contains("[REDACTED]"));
        assert!(!out.contains("super-secret"));
    }
}
