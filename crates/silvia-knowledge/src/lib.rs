// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wikipedia knowledge fallback.
//!
//! Looks up the page summary for the user's text through the REST API
//! (`/api/rest_v1/page/summary/{title}`). Missing pages and empty extracts
//! are reported as `None`, not as errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use silvia_config::model::KnowledgeConfig;
use silvia_core::error::SilviaError;
use silvia_core::traits::{KnowledgeAdapter, PluginAdapter};
use silvia_core::types::{AdapterType, HealthStatus};
use tracing::debug;

const USER_AGENT: &str = concat!("silvia/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(default)]
    extract: String,
    #[serde(default, rename = "type")]
    page_type: Option<String>,
}

/// Wikipedia summary client implementing [`KnowledgeAdapter`].
#[derive(Debug, Clone)]
pub struct WikipediaKnowledge {
    client: reqwest::Client,
    base_url: Url,
}

impl WikipediaKnowledge {
    pub fn new(config: &KnowledgeConfig, timeout: Duration) -> Result<Self, SilviaError> {
        Self::with_base_url(&config.resolved_base_url(), timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, SilviaError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            SilviaError::Config(format!("invalid knowledge.base_url `{base_url}`: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SilviaError::Config(format!(
                "knowledge.base_url `{base_url}` cannot be used as a base URL"
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SilviaError::Knowledge {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client, base_url })
    }

    /// Summary endpoint URL for a free-text query.
    fn summary_url(&self, query: &str) -> Url {
        let title = page_title(query);
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "rest_v1", "page", "summary", title.as_str()]);
        }
        url
    }
}

/// Wikipedia page titles use underscores for spaces.
fn page_title(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join("_")
}

#[async_trait]
impl PluginAdapter for WikipediaKnowledge {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Knowledge
    }

    async fn health_check(&self) -> Result<HealthStatus, SilviaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SilviaError> {
        Ok(())
    }
}

#[async_trait]
impl KnowledgeAdapter for WikipediaKnowledge {
    async fn summarize(&self, query: &str) -> Result<Option<String>, SilviaError> {
        if query.trim().is_empty() {
            return Ok(None);
        }

        let url = self.summary_url(query);
        debug!(url = %url, "fetching page summary");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SilviaError::Knowledge {
                message: format!("summary request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SilviaError::Knowledge {
                message: format!("summary endpoint returned {status}"),
                source: None,
            });
        }

        let summary: PageSummary = response.json().await.map_err(|e| SilviaError::Knowledge {
            message: format!("failed to parse summary: {e}"),
            source: Some(Box::new(e)),
        })?;

        if summary.page_type.as_deref() == Some("disambiguation") {
            debug!("summary is a disambiguation page");
            return Ok(None);
        }

        let extract = summary.extract.trim();
        Ok((!extract.is_empty()).then(|| extract.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn knowledge_for(server: &MockServer) -> WikipediaKnowledge {
        WikipediaKnowledge::with_base_url(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn title_replaces_whitespace() {
        assert_eq!(page_title("  Buenos   Aires "), "Buenos_Aires");
    }

    #[test]
    fn summary_url_percent_encodes_title() {
        let knowledge =
            WikipediaKnowledge::with_base_url("https://es.wikipedia.org", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            knowledge.summary_url("niño perdido").as_str(),
            "https://es.wikipedia.org/api/rest_v1/page/summary/ni%C3%B1o_perdido"
        );
        assert_eq!(
            knowledge.summary_url("AC/DC").as_str(),
            "https://es.wikipedia.org/api/rest_v1/page/summary/AC%2FDC"
        );
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = WikipediaKnowledge::with_base_url("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, SilviaError::Config(_)));
    }

    #[tokio::test]
    async fn returns_extract() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/rest_v1/page/summary/Rust"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "type": "standard",
                "title": "Rust",
                "extract": "Rust es un lenguaje de programación. "
            })))
            .mount(&server)
            .await;

        let summary = knowledge_for(&server).summarize("Rust").await.unwrap();
        assert_eq!(summary.as_deref(), Some("Rust es un lenguaje de programación."));
    }

    #[tokio::test]
    async fn not_found_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert_eq!(knowledge_for(&server).summarize("xyzzy").await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_extract_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"extract": ""})),
            )
            .mount(&server)
            .await;

        assert_eq!(knowledge_for(&server).summarize("algo").await.unwrap(), None);
    }

    #[tokio::test]
    async fn server_error_is_knowledge_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = knowledge_for(&server).summarize("algo").await.unwrap_err();
        assert!(matches!(err, SilviaError::Knowledge { .. }));
    }

    #[tokio::test]
    async fn blank_query_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        assert_eq!(knowledge_for(&server).summarize("   ").await.unwrap(), None);
    }
}
