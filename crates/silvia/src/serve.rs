// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `silvia serve` implementation.
//!
//! Wires the Telegram channel, OpenAI provider, Google transcriber,
//! Wikipedia fallback, SQLite preferences, and the in-memory history and
//! cache into the intake loop, then runs until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use silvia_agent::shutdown::install_signal_handler;
use silvia_agent::{
    AgentLoop, DispatchSettings, Dispatcher, DispatcherDeps, LlmStrategy, VoicePipeline,
};
use silvia_config::SilviaConfig;
use silvia_context::{InMemoryConversationStore, InMemoryResponseCache};
use silvia_core::{
    ChannelAdapter, HealthStatus, KnowledgeAdapter, PluginAdapter, PreferenceStore, SilviaError,
};
use silvia_knowledge::WikipediaKnowledge;
use silvia_openai::OpenAiProvider;
use silvia_speech::GoogleSpeech;
use silvia_storage::SqliteStorage;
use silvia_telegram::TelegramChannel;
use tracing::{info, warn};

/// Runs the bot until SIGINT/SIGTERM or until the channel closes.
pub async fn run_serve(config: SilviaConfig) -> Result<(), SilviaError> {
    init_tracing(&config.agent.log_level);

    info!(name = config.agent.name.as_str(), "starting silvia serve");

    let call_timeout = Duration::from_secs(config.dispatch.call_timeout_secs);

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let provider = Arc::new(OpenAiProvider::new(&config.openai)?);
    info!(model = provider.model(), "openai provider ready");

    let speech = Arc::new(GoogleSpeech::new(&config.speech, call_timeout)?);
    log_health(speech.as_ref()).await;

    let knowledge: Option<Arc<dyn KnowledgeAdapter>> = if config.knowledge.enabled {
        let wiki = WikipediaKnowledge::new(&config.knowledge, call_timeout)?;
        Some(Arc::new(wiki))
    } else {
        info!("knowledge fallback disabled");
        None
    };

    let mut telegram = TelegramChannel::new(config.telegram.clone())?;
    telegram.connect().await?;
    let channel: Arc<dyn ChannelAdapter> = Arc::new(telegram);

    let mut voice = VoicePipeline::new(
        Arc::clone(&channel),
        speech,
        config.speech.accepted_extensions.clone(),
        config.speech.transcription_config(),
        call_timeout,
    );
    if let Some(dir) = &config.speech.temp_dir {
        voice = voice.with_temp_dir(dir);
    }

    let deps = DispatcherDeps {
        channel: Arc::clone(&channel),
        store: Arc::new(InMemoryConversationStore::from_config(&config.history)),
        llm: LlmStrategy::new(
            provider,
            Arc::new(InMemoryResponseCache::from_config(&config.cache)),
            config.openai.model.clone(),
            config.openai.temperature,
            call_timeout,
        ),
        voice,
        knowledge,
        preferences: Some(Arc::clone(&storage) as Arc<dyn PreferenceStore>),
    };
    let settings = DispatchSettings::from_config(&config);
    if settings.admin_chat_id.is_none() {
        warn!("telegram.admin_chat_id is not set, alerts will be dropped");
    }
    info!(mode = ?settings.mode, "dispatcher ready");

    let dispatcher = Arc::new(Dispatcher::new(deps, settings));
    let agent = AgentLoop::new(
        channel,
        dispatcher,
        Duration::from_secs(config.dispatch.drain_timeout_secs),
    );

    let cancel = install_signal_handler();
    let result = agent.run(cancel).await;

    if let Err(e) = storage.shutdown().await {
        warn!(error = %e, "storage shutdown failed");
    }

    info!("silvia serve stopped");
    result
}

async fn log_health(adapter: &dyn PluginAdapter) {
    match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => info!(adapter = adapter.name(), "adapter healthy"),
        Ok(HealthStatus::Degraded(reason)) | Ok(HealthStatus::Unhealthy(reason)) => {
            warn!(adapter = adapter.name(), reason = reason.as_str(), "adapter not fully usable");
        }
        Err(e) => warn!(adapter = adapter.name(), error = %e, "health check failed"),
    }
}

/// Initializes the tracing subscriber with an env filter.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("silvia={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
