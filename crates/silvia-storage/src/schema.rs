// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema creation, versioned through `PRAGMA user_version`.

use rusqlite::Connection;
use tracing::info;

/// Ordered schema steps. Index + 1 is the resulting `user_version`.
const STEPS: &[&str] = &["CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        chat_id TEXT NOT NULL UNIQUE,
        locale TEXT NOT NULL DEFAULT 'es',
        updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );"];

/// Applies every step newer than the database's current version.
pub fn apply(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    let current: usize = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    for (index, step) in STEPS.iter().enumerate().skip(current) {
        let version = index + 1;
        let tx = conn.transaction()?;
        tx.execute_batch(step)?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
        info!(version, "applied preference schema step");
    }
    Ok(())
}

/// Version a fully migrated database reports.
pub fn latest_version() -> usize {
    STEPS.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply(&mut conn).unwrap();
        apply(&mut conn).unwrap();

        let version: usize = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, latest_version());
    }

    #[test]
    fn users_locale_defaults_to_spanish() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply(&mut conn).unwrap();
        conn.execute("INSERT INTO users (chat_id) VALUES ('42')", [])
            .unwrap();
        let locale: String = conn
            .query_row("SELECT locale FROM users WHERE chat_id = '42'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(locale, "es");
    }

    #[test]
    fn chat_id_is_unique() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply(&mut conn).unwrap();
        conn.execute("INSERT INTO users (chat_id) VALUES ('42')", [])
            .unwrap();
        assert!(conn
            .execute("INSERT INTO users (chat_id) VALUES ('42')", [])
            .is_err());
    }
}
