// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the SilvIA bot.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide:
//! long polling for messages and inline keyboard callbacks, plain text
//! replies with optional inline choices, and voice file resolution.

pub mod handler;
pub mod media;

use std::sync::Arc;

use async_trait::async_trait;
use silvia_config::model::TelegramConfig;
use silvia_core::error::SilviaError;
use silvia_core::traits::{ChannelAdapter, PluginAdapter};
use silvia_core::types::{
    AdapterType, HealthStatus, InboundMessage, MessageId, OutboundMessage, ReplyChoice,
    VoiceResource,
};
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Recipient};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram's maximum message length, in characters.
const MAX_MESSAGE_CHARS: usize = 4096;

/// Telegram channel adapter implementing [`ChannelAdapter`].
///
/// Updates are received by a background dispatcher and queued on an mpsc
/// channel drained by [`ChannelAdapter::receive`].
pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundMessage>>,
    inbound_tx: mpsc::Sender<InboundMessage>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: TelegramConfig) -> Result<Self, SilviaError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            SilviaError::Config("telegram.bot_token is required for Telegram adapter".into())
        })?;

        if token.is_empty() {
            return Err(SilviaError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            config,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, SilviaError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), SilviaError> {
        debug!("Telegram channel shutting down");
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), SilviaError> {
        if self.polling_handle.is_some() {
            return Ok(());
        }

        let bot = self.bot.clone();
        let message_tx = self.inbound_tx.clone();
        let callback_tx = self.inbound_tx.clone();
        let allowed_users: Arc<Vec<String>> = Arc::new(self.config.allowed_users.clone());
        let callback_allowed = Arc::clone(&allowed_users);

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let handler = dptree::entry()
                .branch(Update::filter_message().endpoint(move |msg: Message| {
                    let tx = message_tx.clone();
                    let allowed = allowed_users.clone();
                    async move {
                        if !handler::is_authorized(&msg, &allowed) {
                            debug!(chat_id = msg.chat.id.0, "ignoring unauthorized user");
                            return respond(());
                        }

                        let inbound =
                            handler::to_inbound_message(&msg, handler::extract_content(&msg));
                        if tx.send(inbound).await.is_err() {
                            warn!("inbound channel closed, dropping message");
                        }
                        respond(())
                    }
                }))
                .branch(Update::filter_callback_query().endpoint(
                    move |bot: Bot, query: CallbackQuery| {
                        let tx = callback_tx.clone();
                        let allowed = callback_allowed.clone();
                        async move {
                            // Dismiss the client-side spinner regardless of outcome.
                            if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
                                debug!(error = %e, "failed to answer callback query");
                            }

                            if !handler::is_user_authorized(Some(&query.from), &allowed) {
                                debug!(user_id = query.from.id.0, "ignoring unauthorized callback");
                                return respond(());
                            }

                            match handler::callback_to_inbound(&query) {
                                Some(inbound) => {
                                    if tx.send(inbound).await.is_err() {
                                        warn!("inbound channel closed, dropping callback");
                                    }
                                }
                                None => debug!("ignoring callback without data or chat"),
                            }
                            respond(())
                        }
                    },
                ));

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {})
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, SilviaError> {
        let chat_id = parse_chat_id(msg.conversation_id.as_str())?;
        let chunks = split_message(&msg.content, MAX_MESSAGE_CHARS);
        let last = chunks.len().saturating_sub(1);

        let mut sent_id = None;
        for (index, chunk) in chunks.into_iter().enumerate() {
            let request = self.bot.send_message(Recipient::Id(chat_id), chunk);
            let result = if index == last && !msg.choices.is_empty() {
                request.reply_markup(inline_keyboard(&msg.choices)).await
            } else {
                request.await
            };

            let sent = result.map_err(|e| SilviaError::Channel {
                message: format!("failed to send message: {e}"),
                source: Some(Box::new(e)),
            })?;
            sent_id = Some(sent.id.0);
        }

        sent_id
            .map(|id| MessageId(id.to_string()))
            .ok_or_else(|| SilviaError::Channel {
                message: "refusing to send an empty message".into(),
                source: None,
            })
    }

    async fn receive(&self) -> Result<InboundMessage, SilviaError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv()
            .await
            .ok_or_else(|| SilviaError::ChannelClosed("telegram inbound".into()))
    }

    async fn resolve_voice(&self, file_id: &str) -> Result<VoiceResource, SilviaError> {
        media::resolve_file(&self.bot, file_id).await
    }
}

fn parse_chat_id(raw: &str) -> Result<ChatId, SilviaError> {
    raw.parse::<i64>().map(ChatId).map_err(|e| SilviaError::Channel {
        message: format!("invalid chat_id `{raw}`: {e}"),
        source: None,
    })
}

/// One button per row.
fn inline_keyboard(choices: &[ReplyChoice]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        choices
            .iter()
            .map(|c| vec![InlineKeyboardButton::callback(c.label.clone(), c.data.clone())]),
    )
}

/// Splits `text` into chunks of at most `max_chars` characters, preferring
/// line boundaries. Empty text yields no chunks.
fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for line in text.split_inclusive('\n') {
        let line_chars = line.chars().count();
        if current_chars + line_chars > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if line_chars > max_chars {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }
        current.push_str(line);
        current_chars += line_chars;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
