// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the SilvIA bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use silvia_core::types::TranscriptionConfig;

/// Top-level SilvIA configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SilviaConfig {
    /// Assistant identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// OpenAI chat completion settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Speech-to-text settings for voice notes.
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Knowledge fallback (Wikipedia) settings.
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Preference storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Dispatcher behavior settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Response cache bounds.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Conversation history bounds.
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Assistant identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name, also the answer to "what is your name?".
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Locale used when a conversation has no stored preference.
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            default_locale: default_locale(),
        }
    }
}

fn default_agent_name() -> String {
    "SilvIA+".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_locale() -> String {
    "es".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables the Telegram channel.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Telegram user IDs or usernames allowed to talk to the bot.
    /// Empty means everyone.
    #[serde(default)]
    pub allowed_users: Vec<String>,

    /// Chat that receives escalated alerts. `None` drops escalations with a warning.
    #[serde(default)]
    pub admin_chat_id: Option<i64>,
}

/// OpenAI API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// OpenAI API key. `None` falls back to the `OPENAI_API_KEY` env var.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat completions endpoint.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model used for every completion.
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// HTTP client timeout in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            model: default_openai_model(),
            temperature: default_temperature(),
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_http_timeout_secs() -> u64 {
    60
}

/// Speech-to-text configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SpeechConfig {
    /// Google Cloud API key. `None` falls back to the `GOOGLE_API_KEY` env var.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Recognition endpoint.
    #[serde(default = "default_speech_base_url")]
    pub base_url: String,

    /// Audio encoding submitted to the recognizer.
    #[serde(default = "default_encoding")]
    pub encoding: String,

    #[serde(default = "default_sample_rate_hertz")]
    pub sample_rate_hertz: u32,

    #[serde(default = "default_language_code")]
    pub language_code: String,

    /// Transport file extensions accepted by the voice pipeline.
    #[serde(default = "default_accepted_extensions")]
    pub accepted_extensions: Vec<String>,

    /// Directory for downloaded voice notes. `None` uses the system temp dir.
    #[serde(default)]
    pub temp_dir: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_speech_base_url(),
            encoding: default_encoding(),
            sample_rate_hertz: default_sample_rate_hertz(),
            language_code: default_language_code(),
            accepted_extensions: default_accepted_extensions(),
            temp_dir: None,
        }
    }
}

impl SpeechConfig {
    /// The recognition settings sent with every transcription request.
    pub fn transcription_config(&self) -> TranscriptionConfig {
        TranscriptionConfig {
            encoding: self.encoding.clone(),
            sample_rate_hertz: self.sample_rate_hertz,
            language_code: self.language_code.clone(),
        }
    }
}

fn default_speech_base_url() -> String {
    "https://speech.googleapis.com/v1/speech:recognize".to_string()
}

fn default_encoding() -> String {
    "OGG_OPUS".to_string()
}

fn default_sample_rate_hertz() -> u32 {
    48_000
}

fn default_language_code() -> String {
    "es-ES".to_string()
}

fn default_accepted_extensions() -> Vec<String> {
    vec![".ogg".to_string(), ".oga".to_string()]
}

/// Knowledge fallback configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeConfig {
    /// Whether the Wikipedia fallback is consulted when the LLM fails.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Wikipedia base URL. `None` derives `https://{language}.wikipedia.org`.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Wikipedia language edition.
    #[serde(default = "default_locale")]
    pub language: String,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
            language: default_locale(),
        }
    }
}

impl KnowledgeConfig {
    /// Resolved Wikipedia base URL.
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}.wikipedia.org", self.language))
    }
}

fn default_true() -> bool {
    true
}

/// Preference storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("silvia").join("silvia.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("silvia.db"))
        .to_string_lossy()
        .to_string()
}

/// How many strategies a single text message may trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Primary alert/welcome reply plus a secondary name/history/LLM reply.
    #[default]
    Layered,
    /// Exactly one strategy per message, chosen by the classifier.
    Single,
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    #[serde(default)]
    pub mode: DispatchMode,

    /// Upper bound for every external call made while handling a message.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// How long shutdown waits for in-flight messages.
    #[serde(default = "default_drain_timeout_secs")]
    pub drain_timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::default(),
            call_timeout_secs: default_call_timeout_secs(),
            drain_timeout_secs: default_drain_timeout_secs(),
        }
    }
}

fn default_call_timeout_secs() -> u64 {
    30
}

fn default_drain_timeout_secs() -> u64 {
    30
}

/// Response cache bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Maximum cached replies; least recently used are evicted first.
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,

    /// Seconds a cached reply stays valid.
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_cache_max_entries(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_cache_max_entries() -> usize {
    1024
}

fn default_cache_ttl_secs() -> u64 {
    86_400
}

/// Conversation history bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Turns kept per conversation; the oldest are dropped first.
    #[serde(default = "default_max_turns")]
    pub max_turns_per_conversation: usize,

    /// Live conversations kept; the least recently touched is evicted first.
    #[serde(default = "default_max_conversations")]
    pub max_conversations: usize,

    /// Conversations untouched for longer than this are discarded.
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_turns_per_conversation: default_max_turns(),
            max_conversations: default_max_conversations(),
            idle_ttl_secs: default_idle_ttl_secs(),
        }
    }
}

fn default_max_turns() -> usize {
    50
}

fn default_max_conversations() -> usize {
    10_000
}

fn default_idle_ttl_secs() -> u64 {
    6 * 3600
}
