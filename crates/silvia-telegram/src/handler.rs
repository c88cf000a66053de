// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization filtering and conversion of Telegram updates.
//!
//! Messages and inline keyboard callbacks become channel-agnostic
//! [`InboundMessage`]s keyed by the Telegram chat id.

use silvia_core::types::{ConversationId, InboundMessage, MessageContent};
use teloxide::prelude::*;
use teloxide::types::User;

use crate::media;

/// Name reported in [`InboundMessage::channel`].
pub const CHANNEL_NAME: &str = "telegram";

/// Checks whether a user may talk to the bot.
///
/// An empty `allowed_users` list admits everyone. Otherwise the user's id
/// or username (with or without `@`, case-insensitive) must be listed.
/// Updates without a sender are only admitted when the list is empty.
pub fn is_user_authorized(user: Option<&User>, allowed_users: &[String]) -> bool {
    if allowed_users.is_empty() {
        return true;
    }

    let Some(user) = user else {
        return false;
    };

    let user_id_str = user.id.0.to_string();

    allowed_users.iter().any(|allowed| {
        if *allowed == user_id_str {
            return true;
        }
        let allowed_clean = allowed.strip_prefix('@').unwrap_or(allowed);
        user.username
            .as_deref()
            .is_some_and(|username| username.eq_ignore_ascii_case(allowed_clean))
    })
}

/// Checks whether the sender of `msg` is authorized.
pub fn is_authorized(msg: &Message, allowed_users: &[String]) -> bool {
    is_user_authorized(msg.from.as_ref(), allowed_users)
}

/// Extracts content from a Telegram message.
///
/// Text and voice notes are supported; everything else maps to
/// [`MessageContent::Unsupported`] so the dispatcher can log and drop it.
pub fn extract_content(msg: &Message) -> MessageContent {
    if let Some(text) = msg.text() {
        return MessageContent::Text(text.to_string());
    }

    if let Some(voice) = msg.voice() {
        return media::voice_content(voice);
    }

    MessageContent::Unsupported
}

/// Converts a Telegram message and extracted content into an [`InboundMessage`].
pub fn to_inbound_message(msg: &Message, content: MessageContent) -> InboundMessage {
    let sender_id = msg
        .from
        .as_ref()
        .map(|u| u.id.0.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    InboundMessage {
        id: msg.id.0.to_string(),
        conversation_id: ConversationId::from(msg.chat.id.0),
        sender_id,
        channel: CHANNEL_NAME.to_string(),
        content,
        timestamp: msg.date.to_rfc3339(),
    }
}

/// Converts a language keyboard callback into a locale selection.
///
/// Returns `None` when the callback carries no data or its originating
/// message (and so the chat) is unknown.
pub fn callback_to_inbound(query: &CallbackQuery) -> Option<InboundMessage> {
    let data = query.data.as_deref()?.trim();
    if data.is_empty() {
        return None;
    }
    let chat_id = query.message.as_ref()?.chat().id.0;

    Some(InboundMessage {
        id: query.id.to_string(),
        conversation_id: ConversationId::from(chat_id),
        sender_id: query.from.id.0.to_string(),
        channel: CHANNEL_NAME.to_string(),
        content: MessageContent::LocaleSelection(data.to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_json(user_id: u64, username: Option<&str>) -> serde_json::Value {
        let mut from = serde_json::json!({
            "id": user_id,
            "is_bot": false,
            "first_name": "Test",
        });
        if let Some(uname) = username {
            from["username"] = serde_json::json!(uname);
        }
        from
    }

    fn make_message(user_id: u64, username: Option<&str>, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 7,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": from_json(user_id, username),
            "text": text,
        });
        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    fn make_voice_message(chat_id: i64) -> Message {
        let json = serde_json::json!({
            "message_id": 8,
            "date": 1700000000i64,
            "chat": {
                "id": chat_id,
                "type": "supergroup",
                "title": "Vecinos",
            },
            "from": from_json(5, None),
            "voice": {
                "file_id": "AwACAgEAAxkBAAIB",
                "file_unique_id": "AgADBwADr6gxGw",
                "duration": 4,
                "mime_type": "audio/ogg",
                "file_size": 12000
            }
        });
        serde_json::from_value(json).expect("failed to deserialize mock voice message")
    }

    fn make_sticker_like_message() -> Message {
        let json = serde_json::json!({
            "message_id": 9,
            "date": 1700000000i64,
            "chat": {"id": 12i64, "type": "private", "first_name": "Test"},
            "from": from_json(12, None),
            "location": {"latitude": -34.6, "longitude": -58.4}
        });
        serde_json::from_value(json).expect("failed to deserialize mock location message")
    }

    #[test]
    fn empty_allow_list_admits_everyone() {
        let msg = make_message(12345, None, "hola");
        assert!(is_authorized(&msg, &[]));
        assert!(is_user_authorized(None, &[]));
    }

    #[test]
    fn authorized_by_user_id() {
        let msg = make_message(12345, None, "hola");
        assert!(is_authorized(&msg, &["12345".into()]));
    }

    #[test]
    fn authorized_by_username_with_at_case_insensitive() {
        let msg = make_message(12345, Some("TestUser"), "hola");
        assert!(is_authorized(&msg, &["@testuser".into()]));
    }

    #[test]
    fn not_authorized_wrong_user() {
        let msg = make_message(12345, Some("testuser"), "hola");
        assert!(!is_authorized(&msg, &["99999".into()]));
        assert!(!is_user_authorized(None, &["12345".into()]));
    }

    #[test]
    fn text_message_maps_to_inbound() {
        let msg = make_message(12345, Some("testuser"), "¿cómo te llamas?");
        let inbound = to_inbound_message(&msg, extract_content(&msg));

        assert_eq!(inbound.id, "7");
        assert_eq!(inbound.channel, "telegram");
        assert_eq!(inbound.sender_id, "12345");
        assert_eq!(inbound.conversation_id.as_str(), "12345");
        assert_eq!(inbound.content, MessageContent::Text("¿cómo te llamas?".into()));
        assert!(inbound.timestamp.starts_with("2023-11-14"));
    }

    #[test]
    fn voice_message_keeps_file_id_and_group_chat() {
        let msg = make_voice_message(-100123);
        let inbound = to_inbound_message(&msg, extract_content(&msg));
        assert_eq!(inbound.conversation_id.as_str(), "-100123");
        assert_eq!(
            inbound.content,
            MessageContent::Voice {
                file_id: "AwACAgEAAxkBAAIB".into(),
                duration_secs: Some(4),
            }
        );
    }

    #[test]
    fn other_media_is_unsupported() {
        let msg = make_sticker_like_message();
        assert_eq!(extract_content(&msg), MessageContent::Unsupported);
    }

    #[test]
    fn callback_becomes_locale_selection() {
        let json = serde_json::json!({
            "id": "4382bfdwdsb323b2d9",
            "from": from_json(12345, None),
            "chat_instance": "-1",
            "data": "en",
            "message": {
                "message_id": 3,
                "date": 1700000000i64,
                "chat": {"id": 12345i64, "type": "private", "first_name": "Test"},
                "text": "¡Hola! Por favor, elige tu idioma."
            }
        });
        let query: CallbackQuery = serde_json::from_value(json).expect("callback query");
        let inbound = callback_to_inbound(&query).expect("locale selection");
        assert_eq!(inbound.conversation_id.as_str(), "12345");
        assert_eq!(inbound.content, MessageContent::LocaleSelection("en".into()));
    }

    #[test]
    fn callback_without_data_is_ignored() {
        let json = serde_json::json!({
            "id": "1",
            "from": from_json(1, None),
            "chat_instance": "-1",
            "message": {
                "message_id": 3,
                "date": 1700000000i64,
                "chat": {"id": 1i64, "type": "private", "first_name": "Test"},
                "text": "x"
            }
        });
        let query: CallbackQuery = serde_json::from_value(json).expect("callback query");
        assert!(callback_to_inbound(&query).is_none());
    }
}
