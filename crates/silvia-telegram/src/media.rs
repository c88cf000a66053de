// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice note handling for Telegram messages.
//!
//! Files are not downloaded here. The adapter resolves a voice note to its
//! Bot API file path and download URL; fetching is left to the caller.

use silvia_core::error::SilviaError;
use silvia_core::types::{MessageContent, VoiceResource};
use teloxide::prelude::*;
use teloxide::types::{FileId, Voice};
use tracing::debug;

/// Maps a Telegram voice note to [`MessageContent::Voice`].
pub fn voice_content(voice: &Voice) -> MessageContent {
    MessageContent::Voice {
        file_id: voice.file.id.to_string(),
        duration_secs: Some(voice.duration.seconds()),
    }
}

/// Resolves a file id through `getFile` into its path and download URL.
pub async fn resolve_file(bot: &Bot, file_id: &str) -> Result<VoiceResource, SilviaError> {
    let file = bot
        .get_file(FileId(file_id.to_owned()))
        .await
        .map_err(|e| SilviaError::Channel {
            message: format!("failed to get file info: {e}"),
            source: Some(Box::new(e)),
        })?;

    let download_url = file_download_url(bot, &file.path)?;
    debug!(file_id, path = %file.path, "resolved voice file");

    Ok(VoiceResource {
        path: file.path,
        download_url,
    })
}

/// `{api_url}/file/bot{token}/{path}`, the Bot API file download endpoint.
pub fn file_download_url(bot: &Bot, path: &str) -> Result<String, SilviaError> {
    bot.api_url()
        .join(&format!("file/bot{}/{path}", bot.token()))
        .map(|url| url.to_string())
        .map_err(|e| SilviaError::Channel {
            message: format!("invalid file download URL: {e}"),
            source: Some(Box::new(e)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_url_includes_token_and_path() {
        let bot = Bot::new("123:ABC");
        let url = file_download_url(&bot, "voice/file_7.oga").unwrap();
        assert_eq!(url, "https://api.telegram.org/file/bot123:ABC/voice/file_7.oga");
    }
}
