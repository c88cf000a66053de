// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Locale preference queries on the `users` table.

use rusqlite::params;
use silvia_core::SilviaError;

use crate::database::{map_tr_err, Database};

/// Get the stored locale for a chat.
pub async fn get_locale(db: &Database, chat_id: &str) -> Result<Option<String>, SilviaError> {
    let chat_id = chat_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
            let result = conn.query_row(
                "SELECT locale FROM users WHERE chat_id = ?1",
                params![chat_id],
                |row| row.get(0),
            );
            match result {
                Ok(locale) => Ok(Some(locale)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert or replace the locale for a chat.
pub async fn set_locale(db: &Database, chat_id: &str, locale: &str) -> Result<(), SilviaError> {
    let chat_id = chat_id.to_string();
    let locale = locale.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO users (chat_id, locale) VALUES (?1, ?2)
                 ON CONFLICT(chat_id) DO UPDATE SET
                    locale = excluded.locale,
                    updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![chat_id, locale],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Number of chats with a stored preference.
pub async fn count_users(db: &Database) -> Result<u64, SilviaError> {
    db.connection()
        .call(|conn| -> Result<u64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        })
        .await
        .map_err(map_tr_err)
}
