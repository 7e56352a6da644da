use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use modebot_core::errors::ApplicationError;

pub mod bot_config;
pub mod memory;

pub use bot_config::SqlConfigStore;
pub use memory::InMemoryConfigStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not create storage directory `{path}`: {source}")]
    CreateDirectory { path: PathBuf, source: std::io::Error },
    #[error("could not open storage at `{path}`: {source}")]
    Open { path: PathBuf, source: sqlx::Error },
    #[error("schema migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for ApplicationError {
    fn from(value: StorageError) -> Self {
        ApplicationError::Persistence(value.to_string())
    }
}

/// Durable string key/value settings.
///
/// `set` is an upsert: the first write for a key creates the entry, later
/// writes overwrite it in place. Reads fall back to the caller's default.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, key: &str, default: Option<&str>) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
