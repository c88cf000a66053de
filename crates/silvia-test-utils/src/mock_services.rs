// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transcription, knowledge, and preference adapters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use silvia_core::traits::adapter::PluginAdapter;
use silvia_core::types::{AdapterType, ConversationId, HealthStatus, TranscriptionRequest};
use silvia_core::{KnowledgeAdapter, PreferenceStore, SilviaError, TranscriptionAdapter};

macro_rules! mock_plugin_adapter {
    ($ty:ty, $name:literal, $kind:expr) => {
        #[async_trait]
        impl PluginAdapter for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn version(&self) -> semver::Version {
                semver::Version::new(0, 1, 0)
            }

            fn adapter_type(&self) -> AdapterType {
                $kind
            }

            async fn health_check(&self) -> Result<HealthStatus, SilviaError> {
                Ok(HealthStatus::Healthy)
            }

            async fn shutdown(&self) -> Result<(), SilviaError> {
                Ok(())
            }
        }
    };
}

/// What a [`MockTranscriber`] answers with.
#[derive(Debug, Clone)]
pub enum TranscriptOutcome {
    Segments(Vec<String>),
    MissingCredentials,
    Failure,
}

/// Transcriber returning a fixed outcome and recording the audio it saw.
pub struct MockTranscriber {
    outcome: TranscriptOutcome,
    received: Mutex<Vec<Vec<u8>>>,
}

impl MockTranscriber {
    pub fn with_segments(segments: &[&str]) -> Self {
        Self::with_outcome(TranscriptOutcome::Segments(
            segments.iter().map(|s| s.to_string()).collect(),
        ))
    }

    pub fn with_outcome(outcome: TranscriptOutcome) -> Self {
        Self {
            outcome,
            received: Mutex::new(Vec::new()),
        }
    }

    /// Audio payloads passed to `transcribe()`, in order.
    pub async fn received_audio(&self) -> Vec<Vec<u8>> {
        self.received.lock().await.clone()
    }
}

mock_plugin_adapter!(MockTranscriber, "mock-transcriber", AdapterType::Transcription);

#[async_trait]
impl TranscriptionAdapter for MockTranscriber {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<Vec<String>, SilviaError> {
        self.received.lock().await.push(request.audio);
        match &self.outcome {
            TranscriptOutcome::Segments(segments) => Ok(segments.clone()),
            TranscriptOutcome::MissingCredentials => Err(SilviaError::TranscriptionCredential(
                "mock credentials missing".into(),
            )),
            TranscriptOutcome::Failure => Err(SilviaError::Transcription {
                message: "mock transcription failure".into(),
                source: None,
            }),
        }
    }
}

/// Knowledge source with a fixed answer (or failure) and a call counter.
pub struct MockKnowledge {
    summary: Option<String>,
    failing: bool,
    calls: AtomicUsize,
}

impl MockKnowledge {
    pub fn with_summary(summary: &str) -> Self {
        Self {
            summary: Some(summary.to_string()),
            failing: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self {
            summary: None,
            failing: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            summary: None,
            failing: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

mock_plugin_adapter!(MockKnowledge, "mock-knowledge", AdapterType::Knowledge);

#[async_trait]
impl KnowledgeAdapter for MockKnowledge {
    async fn summarize(&self, _query: &str) -> Result<Option<String>, SilviaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(SilviaError::Knowledge {
                message: "mock knowledge failure".into(),
                source: None,
            });
        }
        Ok(self.summary.clone())
    }
}

/// In-memory preference store; can be switched into failing mode.
pub struct MockPreferences {
    locales: Mutex<HashMap<ConversationId, String>>,
    failing: AtomicBool,
}

impl MockPreferences {
    pub fn new() -> Self {
        Self {
            locales: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn failing() -> Self {
        let prefs = Self::new();
        prefs.failing.store(true, Ordering::SeqCst);
        prefs
    }

    /// Stored locale for `id`, bypassing the failure switch.
    pub async fn stored(&self, id: &str) -> Option<String> {
        self.locales
            .lock()
            .await
            .get(&ConversationId::from(id))
            .cloned()
    }

    fn check(&self) -> Result<(), SilviaError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SilviaError::Storage {
                source: "mock preference store failure".into(),
            });
        }
        Ok(())
    }
}

impl Default for MockPreferences {
    fn default() -> Self {
        Self::new()
    }
}

mock_plugin_adapter!(MockPreferences, "mock-preferences", AdapterType::Storage);

#[async_trait]
impl PreferenceStore for MockPreferences {
    async fn initialize(&self) -> Result<(), SilviaError> {
        self.check()
    }

    async fn get_locale(&self, id: &ConversationId) -> Result<Option<String>, SilviaError> {
        self.check()?;
        Ok(self.locales.lock().await.get(id).cloned())
    }

    async fn set_locale(&self, id: &ConversationId, locale: &str) -> Result<(), SilviaError> {
        self.check()?;
        self.locales
            .lock()
            .await
            .insert(id.clone(), locale.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silvia_core::types::TranscriptionConfig;

    #[tokio::test]
    async fn transcriber_outcomes() {
        let ok = MockTranscriber::with_segments(&["hola", "mundo"]);
        let request = TranscriptionRequest {
            audio: b"OggS".to_vec(),
            config: TranscriptionConfig::default(),
        };
        assert_eq!(ok.transcribe(request.clone()).await.unwrap(), vec!["hola", "mundo"]);
        assert_eq!(ok.received_audio().await, vec![b"OggS".to_vec()]);

        let creds = MockTranscriber::with_outcome(TranscriptOutcome::MissingCredentials);
        assert!(matches!(
            creds.transcribe(request).await,
            Err(SilviaError::TranscriptionCredential(_))
        ));
    }

    #[tokio::test]
    async fn preferences_round_trip_and_fail() {
        let prefs = MockPreferences::new();
        let id = ConversationId::from("9");
        assert_eq!(prefs.get_locale(&id).await.unwrap(), None);
        prefs.set_locale(&id, "en").await.unwrap();
        assert_eq!(prefs.get_locale(&id).await.unwrap().as_deref(), Some("en"));

        let broken = MockPreferences::failing();
        assert!(broken.get_locale(&id).await.is_err());
    }

    #[tokio::test]
    async fn knowledge_counts_calls() {
        let knowledge = MockKnowledge::with_summary("Resumen");
        assert_eq!(
            knowledge.summarize("x").await.unwrap().as_deref(),
            Some("Resumen")
        );
        assert!(MockKnowledge::failing().summarize("x").await.is_err());
        assert_eq!(knowledge.call_count(), 1);
    }
}
