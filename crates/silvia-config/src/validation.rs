// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes.

use crate::diagnostic::ConfigError;
use crate::model::SilviaConfig;

/// Locales with a reply catalog.
pub const SUPPORTED_LOCALES: &[&str] = &["es", "en"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every violation instead of failing fast.
pub fn validate_config(config: &SilviaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.agent.name.trim().is_empty() {
        fail("agent.name must not be empty".to_string());
    }

    if !SUPPORTED_LOCALES.contains(&config.agent.default_locale.as_str()) {
        fail(format!(
            "agent.default_locale `{}` is not one of {}",
            config.agent.default_locale,
            SUPPORTED_LOCALES.join(", ")
        ));
    }

    if let Some(token) = &config.telegram.bot_token
        && token.trim().is_empty()
    {
        fail("telegram.bot_token must not be empty when set".to_string());
    }

    if !(0.0..=2.0).contains(&config.openai.temperature) {
        fail(format!(
            "openai.temperature must be between 0.0 and 2.0, got {}",
            config.openai.temperature
        ));
    }

    for (key, url) in [
        ("openai.base_url", config.openai.base_url.as_str()),
        ("speech.base_url", config.speech.base_url.as_str()),
    ] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            fail(format!("{key} must be an http(s) URL, got `{url}`"));
        }
    }

    if config.speech.sample_rate_hertz == 0 {
        fail("speech.sample_rate_hertz must be positive".to_string());
    }

    if config.speech.accepted_extensions.is_empty() {
        fail("speech.accepted_extensions must list at least one extension".to_string());
    }
    for ext in &config.speech.accepted_extensions {
        if !ext.starts_with('.') || ext.len() < 2 {
            fail(format!(
                "speech.accepted_extensions entry `{ext}` must look like `.ogg`"
            ));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    for (key, value) in [
        ("dispatch.call_timeout_secs", config.dispatch.call_timeout_secs),
        ("cache.ttl_secs", config.cache.ttl_secs),
        ("history.idle_ttl_secs", config.history.idle_ttl_secs),
        ("openai.timeout_secs", config.openai.timeout_secs),
    ] {
        if value == 0 {
            fail(format!("{key} must be positive"));
        }
    }

    for (key, value) in [
        ("cache.max_entries", config.cache.max_entries),
        (
            "history.max_turns_per_conversation",
            config.history.max_turns_per_conversation,
        ),
        ("history.max_conversations", config.history.max_conversations),
    ] {
        if value == 0 {
            fail(format!("{key} must be positive"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
