use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::debug;

use crate::repositories::StorageError;

pub type DbPool = sqlx::SqlitePool;

const IDLE_CONNECTION_SECS: u64 = 30;
const BUSY_TIMEOUT_SECS: u64 = 5;

pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    let options = connect_options(SqliteConnectOptions::from_str(database_url)?);
    pool_options(max_connections, timeout_secs).connect_with(options).await
}

/// Opens the on-disk settings database, creating its parent directory and the
/// database file when they do not exist yet.
pub async fn open_storage(
    path: &Path,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, StorageError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|source| {
            StorageError::CreateDirectory { path: parent.to_path_buf(), source }
        })?;
    }

    let options = connect_options(SqliteConnectOptions::new().filename(path));
    let pool = pool_options(max_connections, timeout_secs)
        .min_connections(0)
        .idle_timeout(Duration::from_secs(IDLE_CONNECTION_SECS))
        .connect_with(options)
        .await
        .map_err(|source| StorageError::Open { path: path.to_path_buf(), source })?;

    debug!(
        event_name = "storage.connection.opened",
        path = %path.display(),
        max_connections,
        "settings storage opened"
    );
    Ok(pool)
}

// sqlx installs the busy handler before issuing the journal_mode pragma.
fn connect_options(options: SqliteConnectOptions) -> SqliteConnectOptions {
    options
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS))
        .journal_mode(SqliteJournalMode::Wal)
}

fn pool_options(max_connections: u32, timeout_secs: u64) -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
}
