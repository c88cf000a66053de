// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-message dispatch: locale resolution, intent routing, and replies.
//!
//! Every message for a conversation runs under that conversation's async
//! mutex, so the user turn, the context snapshot, and the assistant turn of
//! one message are never interleaved with another message of the same chat.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use silvia_config::model::DispatchMode;
use silvia_config::SilviaConfig;
use silvia_core::types::{InboundMessage, MessageContent, OutboundMessage, Turn};
use silvia_core::{
    ChannelAdapter, ConversationId, ConversationStore, KnowledgeAdapter, PreferenceStore,
    SilviaError,
};
use silvia_router::{
    alert_kind, classify, is_greeting, is_history_query, is_name_query, normalize, AlertKind,
    Intent,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::bounded;
use crate::llm::LlmStrategy;
use crate::replies::{self, Locale};
use crate::voice::VoicePipeline;

/// Command that opens the language picker.
pub const START_COMMAND: &str = "/start";

/// Command that discards the conversation history.
pub const RESET_COMMAND: &str = "/reset";

/// Static dispatcher settings, usually derived from [`SilviaConfig`].
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub mode: DispatchMode,
    pub assistant_name: String,
    pub admin_chat_id: Option<ConversationId>,
    pub default_locale: Locale,
    pub call_timeout: Duration,
}

impl DispatchSettings {
    pub fn from_config(config: &SilviaConfig) -> Self {
        Self {
            mode: config.dispatch.mode,
            assistant_name: config.agent.name.clone(),
            admin_chat_id: config.telegram.admin_chat_id.map(ConversationId::from),
            default_locale: Locale::parse(&config.agent.default_locale).unwrap_or_default(),
            call_timeout: Duration::from_secs(config.dispatch.call_timeout_secs),
        }
    }
}

/// Collaborators the dispatcher talks to.
pub struct DispatcherDeps {
    pub channel: Arc<dyn ChannelAdapter>,
    pub store: Arc<dyn ConversationStore>,
    pub llm: LlmStrategy,
    pub voice: VoicePipeline,
    pub knowledge: Option<Arc<dyn KnowledgeAdapter>>,
    pub preferences: Option<Arc<dyn PreferenceStore>>,
}

pub struct Dispatcher {
    deps: DispatcherDeps,
    settings: DispatchSettings,
    locks: DashMap<ConversationId, Arc<Mutex<()>>>,
}

impl Dispatcher {
    pub fn new(deps: DispatcherDeps, settings: DispatchSettings) -> Self {
        Self {
            deps,
            settings,
            locks: DashMap::new(),
        }
    }

    /// Handles one message and turns failures into a logged outcome.
    ///
    /// Invalid messages are dropped silently. Transport failures (sends and
    /// voice file lookups) are only logged; anything else also gets a generic
    /// apology.
    pub async fn dispatch(&self, msg: InboundMessage) {
        let conversation_id = msg.conversation_id.clone();

        match self.handle(msg).await {
            Ok(()) => {}
            Err(SilviaError::InvalidMessage(reason)) => {
                debug!(
                    conversation_id = conversation_id.as_str(),
                    reason = reason.as_str(),
                    "dropping invalid message"
                );
            }
            Err(e @ SilviaError::Channel { .. }) => {
                error!(
                    conversation_id = conversation_id.as_str(),
                    error = %e,
                    "chat transport failed"
                );
            }
            Err(e) => {
                error!(
                    conversation_id = conversation_id.as_str(),
                    error = %e,
                    "failed to handle message"
                );
                let locale = self.locale_for(&conversation_id).await;
                if let Err(send_err) = self
                    .send_text(&conversation_id, replies::generic_error(locale))
                    .await
                {
                    warn!(error = %send_err, "failed to send error reply");
                }
            }
        }
    }

    /// Handles one message under its conversation lock.
    pub async fn handle(&self, msg: InboundMessage) -> Result<(), SilviaError> {
        let id = msg.conversation_id.clone();
        let lock = self.lock_for(&id);
        let result = {
            let _guard = lock.lock().await;
            self.handle_locked(msg).await
        };
        drop(lock);
        self.release_lock(&id);
        result
    }

    async fn handle_locked(&self, msg: InboundMessage) -> Result<(), SilviaError> {
        let id = msg.conversation_id;

        match msg.content {
            MessageContent::Unsupported => Err(SilviaError::InvalidMessage(
                "message carries neither text nor voice".into(),
            )),
            MessageContent::LocaleSelection(code) => self.handle_locale_selection(&id, &code).await,
            MessageContent::Voice { file_id, .. } => self.handle_voice(&id, &file_id).await,
            MessageContent::Text(text) => {
                if text.trim().is_empty() {
                    return Err(SilviaError::InvalidMessage("empty text".into()));
                }
                self.handle_text(&id, &text).await
            }
        }
    }

    async fn handle_locale_selection(
        &self,
        id: &ConversationId,
        code: &str,
    ) -> Result<(), SilviaError> {
        let Some(locale) = Locale::parse(code) else {
            warn!(
                conversation_id = id.as_str(),
                locale = code,
                "ignoring unsupported locale selection"
            );
            return Ok(());
        };

        if let Some(prefs) = &self.deps.preferences {
            bounded(
                self.settings.call_timeout,
                prefs.set_locale(id, locale.code()),
            )
            .await?;
        }
        info!(
            conversation_id = id.as_str(),
            locale = locale.code(),
            "conversation locale changed"
        );
        self.send_text(id, replies::language_changed(locale)).await
    }

    async fn handle_voice(&self, id: &ConversationId, file_id: &str) -> Result<(), SilviaError> {
        let locale = self.locale_for(id).await;
        debug!(
            conversation_id = id.as_str(),
            intent = %Intent::VoiceMessage,
            "routing message"
        );

        match self.deps.voice.transcribe(file_id).await {
            Ok(transcript) if transcript.trim().is_empty() => {
                self.send_text(id, replies::not_understood(locale)).await
            }
            Ok(transcript) => self.send_text(id, transcript).await,
            Err(SilviaError::TranscriptionCredential(reason)) => {
                error!(
                    conversation_id = id.as_str(),
                    reason = reason.as_str(),
                    "transcription credentials unavailable"
                );
                self.send_text(id, replies::voice_credentials(locale)).await
            }
            Err(e) if e.is_voice_error() => {
                warn!(conversation_id = id.as_str(), error = %e, "voice pipeline failed");
                self.send_text(id, replies::generic_error(locale)).await
            }
            Err(e) => Err(e),
        }
    }

    async fn handle_text(&self, id: &ConversationId, text: &str) -> Result<(), SilviaError> {
        let locale = self.locale_for(id).await;

        if normalize(text) == START_COMMAND {
            let msg = OutboundMessage::text(id.clone(), replies::language_prompt(locale))
                .with_choices(replies::language_choices());
            return self.send(msg).await;
        }

        if normalize(text) == RESET_COMMAND {
            self.deps.store.clear(id).await;
            info!(conversation_id = id.as_str(), "conversation history cleared");
            return self.send_text(id, replies::history_cleared(locale)).await;
        }

        let snapshot = self.deps.store.get(id).await;
        self.deps.store.append(id, Turn::user(text)).await;

        let intent = classify(text);
        debug!(
            conversation_id = id.as_str(),
            intent = %intent,
            mode = ?self.settings.mode,
            "routing message"
        );

        match self.settings.mode {
            DispatchMode::Layered => self.dispatch_layered(id, text, locale, &snapshot).await,
            DispatchMode::Single => {
                self.dispatch_single(id, text, intent, locale, &snapshot)
                    .await
            }
        }
    }

    /// Primary alert/welcome reply followed by a name/history/LLM reply.
    async fn dispatch_layered(
        &self,
        id: &ConversationId,
        text: &str,
        locale: Locale,
        snapshot: &[Turn],
    ) -> Result<(), SilviaError> {
        match alert_kind(text) {
            Some(AlertKind::Exact) => self.send_text(id, replies::loan_info(locale)).await?,
            Some(AlertKind::Contextual) => self.escalate(id, text).await,
            None => {
                let welcome = replies::welcome(locale, &self.settings.assistant_name);
                self.send_text(id, welcome).await?;
            }
        }

        if is_name_query(text) {
            self.send_text(id, self.settings.assistant_name.clone()).await
        } else if is_history_query(text) {
            self.send_text(id, replies::history(locale, snapshot)).await
        } else {
            self.reply_with_llm(id, text, locale).await
        }
    }

    async fn dispatch_single(
        &self,
        id: &ConversationId,
        text: &str,
        intent: Intent,
        locale: Locale,
        snapshot: &[Turn],
    ) -> Result<(), SilviaError> {
        match intent {
            Intent::NameQuery => {
                self.send_text(id, self.settings.assistant_name.clone())
                    .await
            }
            Intent::HistoryQuery => self.send_text(id, replies::history(locale, snapshot)).await,
            Intent::AlertKeywordExact => self.send_text(id, replies::loan_info(locale)).await,
            Intent::AlertKeywordContextual => {
                self.escalate(id, text).await;
                self.send_text(id, replies::alert_ack(locale)).await
            }
            Intent::GreetingOrFallback if is_greeting(text) => {
                let welcome = replies::welcome(locale, &self.settings.assistant_name);
                self.send_text(id, welcome).await
            }
            Intent::GreetingOrFallback => self.reply_with_llm(id, text, locale).await,
            Intent::VoiceMessage => Err(SilviaError::Internal(
                "text message classified as voice".into(),
            )),
        }
    }

    /// LLM reply, then knowledge summary, then the "could not understand" reply.
    async fn reply_with_llm(
        &self,
        id: &ConversationId,
        text: &str,
        locale: Locale,
    ) -> Result<(), SilviaError> {
        let turns = self.deps.store.get(id).await;

        if let Some(reply) = self.deps.llm.reply(&turns).await {
            self.deps.store.append(id, Turn::assistant(reply.clone())).await;
            return self.send_text(id, reply).await;
        }

        if let Some(summary) = self.summarize(text).await {
            return self.send_text(id, summary).await;
        }

        self.send_text(id, replies::not_understood(locale)).await
    }

    async fn summarize(&self, text: &str) -> Option<String> {
        let knowledge = self.deps.knowledge.as_ref()?;
        match bounded(self.settings.call_timeout, knowledge.summarize(text)).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "knowledge lookup failed");
                None
            }
        }
    }

    /// Forwards `text` to the administrative chat. Never fails the caller.
    async fn escalate(&self, id: &ConversationId, text: &str) {
        let Some(admin) = &self.settings.admin_chat_id else {
            warn!(
                conversation_id = id.as_str(),
                "alert keyword detected but no admin chat is configured, dropping alert"
            );
            return;
        };

        info!(conversation_id = id.as_str(), "escalating alert to admin chat");
        if let Err(e) = self.send_text(admin, replies::alert(text)).await {
            error!(
                conversation_id = id.as_str(),
                error = %e,
                "failed to deliver alert to admin chat"
            );
        }
    }

    /// Stored locale for `id`, or the default when absent or unreadable.
    async fn locale_for(&self, id: &ConversationId) -> Locale {
        let default = self.settings.default_locale;
        let Some(prefs) = &self.deps.preferences else {
            return default;
        };

        match bounded(self.settings.call_timeout, prefs.get_locale(id)).await {
            Ok(Some(code)) => Locale::parse(&code).unwrap_or(default),
            Ok(None) => default,
            Err(e) => {
                warn!(
                    conversation_id = id.as_str(),
                    error = %e,
                    "failed to read locale, using default"
                );
                default
            }
        }
    }

    async fn send_text(
        &self,
        id: &ConversationId,
        content: impl Into<String>,
    ) -> Result<(), SilviaError> {
        self.send(OutboundMessage::text(id.clone(), content)).await
    }

    async fn send(&self, msg: OutboundMessage) -> Result<(), SilviaError> {
        bounded(self.settings.call_timeout, self.deps.channel.send(msg)).await?;
        Ok(())
    }

    fn lock_for(&self, id: &ConversationId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops the lock entry once no other task holds or awaits it.
    fn release_lock(&self, id: &ConversationId) {
        self.locks.remove_if(id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Number of conversations with a live lock entry.
    pub fn active_conversations(&self) -> usize {
        self.locks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silvia_context::{InMemoryConversationStore, InMemoryResponseCache};
    use silvia_core::types::TranscriptionConfig;
    use silvia_test_utils::{inbound, MockChannel, MockProvider, MockTranscriber};
    use tracing_test::traced_test;

    fn dispatcher(channel: Arc<MockChannel>, admin: Option<&str>) -> Dispatcher {
        let timeout = Duration::from_secs(5);
        let deps = DispatcherDeps {
            channel: channel.clone(),
            store: Arc::new(InMemoryConversationStore::default()),
            llm: LlmStrategy::new(
                Arc::new(MockProvider::new()),
                Arc::new(InMemoryResponseCache::default()),
                "gpt-3.5-turbo".into(),
                0.7,
                timeout,
            ),
            voice: VoicePipeline::new(
                channel,
                Arc::new(MockTranscriber::with_segments(&[])),
                vec![".ogg".into()],
                TranscriptionConfig::default(),
                timeout,
            ),
            knowledge: None,
            preferences: None,
        };
        let settings = DispatchSettings {
            mode: DispatchMode::Single,
            assistant_name: "SilvIA+".into(),
            admin_chat_id: admin.map(ConversationId::from),
            default_locale: Locale::Es,
            call_timeout: timeout,
        };
        Dispatcher::new(deps, settings)
    }

    #[test]
    fn settings_follow_config() {
        let mut config = SilviaConfig::default();
        config.telegram.admin_chat_id = Some(-42);
        config.agent.default_locale = "en".into();
        config.dispatch.mode = DispatchMode::Single;

        let settings = DispatchSettings::from_config(&config);
        assert_eq!(settings.admin_chat_id, Some(ConversationId::from("-42")));
        assert_eq!(settings.default_locale, Locale::En);
        assert_eq!(settings.mode, DispatchMode::Single);
        assert_eq!(settings.assistant_name, "SilvIA+");
        assert_eq!(settings.call_timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    #[traced_test]
    async fn missing_admin_chat_is_logged() {
        let channel = Arc::new(MockChannel::new());
        let dispatcher = dispatcher(channel.clone(), None);

        dispatcher
            .dispatch(inbound("5", MessageContent::Text("vi al nene".into())))
            .await;

        assert!(logs_contain("no admin chat is configured"));
        assert_eq!(
            channel.sent_to("5").await,
            vec![replies::alert_ack(Locale::Es).to_string()]
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn send_failures_are_logged_without_apology() {
        let channel = Arc::new(MockChannel::new());
        channel.fail_sends(true);
        let dispatcher = dispatcher(channel.clone(), Some("-1"));

        dispatcher
            .dispatch(inbound("5", MessageContent::Text("hola".into())))
            .await;

        assert!(logs_contain("chat transport failed"));
        assert_eq!(channel.sent_count().await, 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn voice_lookup_failure_is_logged_without_apology() {
        let channel = Arc::new(MockChannel::new());
        let dispatcher = dispatcher(channel.clone(), None);

        dispatcher
            .dispatch(inbound(
                "5",
                MessageContent::Voice {
                    file_id: "missing".into(),
                    duration_secs: None,
                },
            ))
            .await;

        assert!(logs_contain("chat transport failed"));
        assert!(!logs_contain("voice pipeline failed"));
        assert_eq!(channel.sent_count().await, 0);
    }

    #[tokio::test]
    async fn lock_entries_are_released() {
        let channel = Arc::new(MockChannel::new());
        let dispatcher = dispatcher(channel, None);

        dispatcher
            .handle(inbound("5", MessageContent::Text("hola".into())))
            .await
            .unwrap();
        assert_eq!(dispatcher.active_conversations(), 0);
    }

    #[tokio::test]
    async fn empty_voice_transcript_is_not_understood() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_bytes(b"OggS".to_vec()))
            .mount(&server)
            .await;

        let channel = Arc::new(MockChannel::new());
        channel
            .add_voice_file("v", "voice/a.ogg", &format!("{}/a.ogg", server.uri()))
            .await;
        let dispatcher = dispatcher(channel.clone(), None);

        dispatcher
            .dispatch(inbound(
                "5",
                MessageContent::Voice {
                    file_id: "v".into(),
                    duration_secs: None,
                },
            ))
            .await;

        assert_eq!(
            channel.sent_to("5").await,
            vec![replies::not_understood(Locale::Es).to_string()]
        );
    }
}
