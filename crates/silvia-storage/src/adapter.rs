// SPDX-FileCopyrightText: 2026 SilvIA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the PreferenceStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use silvia_config::model::StorageConfig;
use silvia_core::traits::{PluginAdapter, PreferenceStore};
use silvia_core::types::{AdapterType, ConversationId, HealthStatus};
use silvia_core::SilviaError;

use crate::database::{map_tr_err, Database};
use crate::queries;

/// SQLite-backed preference store.
///
/// The database is opened on the first call to [`PreferenceStore::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// The connection is not opened until [`PreferenceStore::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, SilviaError> {
        self.db.get().ok_or_else(|| SilviaError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, SilviaError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SilviaError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(map_tr_err)?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for SqliteStorage {
    async fn initialize(&self) -> Result<(), SilviaError> {
        let db = Database::open(&self.config.database_path).await?;
        self.db.set(db).map_err(|_| SilviaError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite preference store initialized");
        Ok(())
    }

    async fn get_locale(&self, id: &ConversationId) -> Result<Option<String>, SilviaError> {
        queries::users::get_locale(self.db()?, id.as_str()).await
    }

    async fn set_locale(&self, id: &ConversationId, locale: &str) -> Result<(), SilviaError> {
        queries::users::set_locale(self.db()?, id.as_str(), locale).await
    }
}
