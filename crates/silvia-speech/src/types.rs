// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response bodies for `speech:recognize`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct RecognizeRequest {
    pub config: RecognitionConfig,
    pub audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionConfig {
    pub encoding: String,
    pub sample_rate_hertz: u32,
    pub language_code: String,
}

#[derive(Debug, Serialize)]
pub struct RecognitionAudio {
    /// Base64-encoded audio bytes.
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecognizeResponse {
    #[serde(default)]
    pub results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
pub struct RecognitionResult {
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
pub struct Alternative {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl RecognizeResponse {
    /// The top alternative of every result, in order.
    pub fn segments(self) -> Vec<String> {
        self.results
            .into_iter()
            .filter_map(|r| r.alternatives.into_iter().next())
            .map(|a| a.transcript)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_without_alternatives_are_skipped() {
        let response: RecognizeResponse = serde_json::from_str(
            r#"{"results": [{"alternatives": []}, {"alternatives": [{"transcript": "sí"}]}]}"#,
        )
        .unwrap();
        assert_eq!(response.segments(), vec!["sí"]);
    }

    #[test]
    fn config_serializes_camel_case() {
        let value = serde_json::to_value(RecognitionConfig {
            encoding: "OGG_OPUS".into(),
            sample_rate_hertz: 48_000,
            language_code: "es-ES".into(),
        })
        .unwrap();
        assert_eq!(value["sampleRateHertz"], 48_000);
        assert_eq!(value["languageCode"], "es-ES");
    }
}
