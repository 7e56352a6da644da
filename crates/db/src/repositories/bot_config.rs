use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use modebot_core::config::DatabaseConfig;

use super::{ConfigStore, StorageError};
use crate::{connection::open_storage, migrations, DbPool};

pub struct SqlConfigStore {
    pool: DbPool,
}

impl SqlConfigStore {
    /// Wraps a pool whose schema is already migrated.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn initialize(location: &Path) -> Result<Self, StorageError> {
        Self::open(location, 5, 30).await
    }

    pub async fn initialize_with(database: &DatabaseConfig) -> Result<Self, StorageError> {
        Self::open(&database.path, database.max_connections, database.timeout_secs).await
    }

    async fn open(
        location: &Path,
        max_connections: u32,
        timeout_secs: u64,
    ) -> Result<Self, StorageError> {
        let pool = open_storage(location, max_connections, timeout_secs).await?;
        migrations::run_pending(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ConfigStore for SqlConfigStore {
    async fn get(&self, key: &str, default: Option<&str>) -> Result<Option<String>, StorageError> {
        let stored: Option<String> =
            sqlx::query_scalar("SELECT value FROM bot_config WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(stored.or_else(|| default.map(str::to_owned)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO bot_config (key, value)
             VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        debug!(event_name = "storage.config.upserted", key, "config entry written");
        Ok(())
    }
}
