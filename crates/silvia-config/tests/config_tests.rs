// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the SilvIA configuration system.

use silvia_config::diagnostic::{suggest_key, ConfigError};
use silvia_config::model::{DispatchMode, SilviaConfig};
use silvia_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn valid_toml_deserializes_into_silvia_config() {
    let toml = r#"
[agent]
name = "Silvia Test"
log_level = "debug"
default_locale = "en"

[telegram]
bot_token = "123:ABC"
allowed_users = ["alice", "42"]
admin_chat_id = -1001234

[openai]
api_key = "sk-test"
model = "gpt-4o-mini"
temperature = 0.2

[speech]
api_key = "g-key"
language_code = "en-US"
accepted_extensions = [".ogg"]

[knowledge]
enabled = false
language = "en"

[storage]
database_path = "/tmp/silvia-test.db"

[dispatch]
mode = "single"
call_timeout_secs = 5

[cache]
max_entries = 16
ttl_secs = 60

[history]
max_turns_per_conversation = 10
max_conversations = 100
idle_ttl_secs = 120
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "Silvia Test");
    assert_eq!(config.agent.default_locale, "en");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.telegram.allowed_users, vec!["alice", "42"]);
    assert_eq!(config.telegram.admin_chat_id, Some(-1001234));
    assert_eq!(config.openai.model, "gpt-4o-mini");
    assert!((config.openai.temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(config.speech.language_code, "en-US");
    assert_eq!(config.speech.accepted_extensions, vec![".ogg"]);
    assert!(!config.knowledge.enabled);
    assert_eq!(config.knowledge.resolved_base_url(), "https://en.wikipedia.org");
    assert_eq!(config.storage.database_path, "/tmp/silvia-test.db");
    assert_eq!(config.dispatch.mode, DispatchMode::Single);
    assert_eq!(config.dispatch.call_timeout_secs, 5);
    assert_eq!(config.cache.max_entries, 16);
    assert_eq!(config.history.max_turns_per_conversation, 10);
}

/// An empty file yields the documented defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should deserialize");
    assert_eq!(config.agent.name, "SilvIA+");
    assert_eq!(config.agent.default_locale, "es");
    assert_eq!(config.openai.model, "gpt-3.5-turbo");
    assert!((config.openai.temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(config.speech.encoding, "OGG_OPUS");
    assert_eq!(config.speech.sample_rate_hertz, 48_000);
    assert_eq!(config.speech.language_code, "es-ES");
    assert_eq!(config.speech.accepted_extensions, vec![".ogg", ".oga"]);
    assert_eq!(config.dispatch.mode, DispatchMode::Layered);
    assert!(config.telegram.admin_chat_id.is_none());
    assert!(config.telegram.allowed_users.is_empty());
}

/// Unknown field in [openai] is reported with a suggestion and a source span.
#[test]
fn unknown_field_produces_suggestion() {
    let toml = "[openai]\nmodle = \"gpt-4o\"\n";
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            span,
            ..
        } => {
            assert_eq!(key, "modle");
            assert_eq!(suggestion.as_deref(), Some("model"));
            assert!(span.is_some(), "inline source should be located");
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[anthropic]\napi_key = \"x\"\n").unwrap_err();
    assert!(matches!(&errors[0], ConfigError::UnknownKey { key, .. } if key == "anthropic"));
}

/// Wrong value type surfaces as InvalidType.
#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[cache]\nmax_entries = \"many\"\n").unwrap_err();
    assert!(
        matches!(&errors[0], ConfigError::InvalidType { key, .. } if key.contains("max_entries")),
        "got {errors:?}"
    );
}

/// An unknown dispatch mode is rejected at deserialization.
#[test]
fn unknown_dispatch_mode_is_rejected() {
    assert!(load_config_from_str("[dispatch]\nmode = \"parallel\"\n").is_err());
}

/// Semantic validation runs after successful deserialization.
#[test]
fn validation_errors_are_collected() {
    let toml = r#"
[openai]
temperature = 3.0

[speech]
sample_rate_hertz = 0
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 2, "got {errors:?}");
    assert!(errors.iter().all(|e| matches!(e, ConfigError::Validation { .. })));
}

#[test]
fn default_config_round_trips_through_toml() {
    let rendered = toml::to_string(&SilviaConfig::default()).expect("serialize defaults");
    let parsed = load_and_validate_str(&rendered).expect("defaults should validate");
    assert_eq!(parsed.agent.name, "SilvIA+");
}

#[test]
fn suggest_key_is_exported() {
    assert_eq!(
        suggest_key("max_entires", &["max_entries", "ttl_secs"]),
        Some("max_entries".to_string())
    );
}
