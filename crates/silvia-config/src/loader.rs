// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./silvia.toml` > `~/.config/silvia/silvia.toml` > `/etc/silvia/silvia.toml`
//! with environment variable overrides via `SILVIA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SilviaConfig;

/// Config sections addressable from environment variables.
const ENV_SECTIONS: &[&str] = &[
    "agent",
    "telegram",
    "openai",
    "speech",
    "knowledge",
    "storage",
    "dispatch",
    "cache",
    "history",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/silvia/silvia.toml` (system-wide)
/// 3. `~/.config/silvia/silvia.toml` (user XDG config)
/// 4. `./silvia.toml` (local directory)
/// 5. `SILVIA_*` environment variables
pub fn load_config() -> Result<SilviaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SilviaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SilviaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SilviaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SilviaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SilviaConfig::default()))
        .merge(Toml::file("/etc/silvia/silvia.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("silvia/silvia.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("silvia.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SILVIA_TELEGRAM_BOT_TOKEN` must map to `telegram.bot_token`,
/// not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("SILVIA_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a prefix-stripped env var name (any case) to a dotted config key.
pub(crate) fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}
