// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup and schema creation.
//!
//! All statements are serialized through tokio-rusqlite's single background thread.

use std::path::Path;

use silvia_core::SilviaError;
use tracing::debug;

use crate::schema;

/// Handle to the preference database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database file and applies the schema.
    pub async fn open(path: &str) -> Result<Self, SilviaError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| SilviaError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| SilviaError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare().await?;
        debug!(path, "preference database opened");
        Ok(db)
    }

    /// Opens a private in-memory database.
    pub async fn open_in_memory() -> Result<Self, SilviaError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| SilviaError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare().await?;
        Ok(db)
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    async fn prepare(&self) -> Result<(), SilviaError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(
                    "PRAGMA journal_mode = WAL;
                     PRAGMA synchronous = NORMAL;
                     PRAGMA busy_timeout = 5000;",
                )?;
                schema::apply(conn)
            })
            .await
            .map_err(map_tr_err)
    }
}

/// Converts a tokio-rusqlite error into a storage error.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> SilviaError {
    SilviaError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn user_version(db: &Database) -> usize {
        db.connection()
            .call(|conn| conn.query_row("PRAGMA user_version", [], |row| row.get(0)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn in_memory_database_gets_schema() {
        let db = Database::open_in_memory().await.unwrap();
        assert_eq!(user_version(&db).await, schema::latest_version());
    }

    #[tokio::test]
    async fn open_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/prefs.db");

        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        assert!(path.exists());
        assert_eq!(user_version(&db).await, schema::latest_version());
    }

    #[tokio::test]
    async fn unopenable_path_is_a_storage_error() {
        let dir = tempdir().unwrap();
        // The database path is an existing directory, so SQLite cannot open it.
        let err = Database::open(dir.path().to_str().unwrap())
            .await
            .err()
            .expect("opening a directory should fail");
        assert!(matches!(err, SilviaError::Storage { .. }));
    }
}
