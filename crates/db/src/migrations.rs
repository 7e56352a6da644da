use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use tracing::debug;

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

const MIGRATION_ATTEMPTS: u32 = 5;
const RETRY_BACKOFF_MS: u64 = 50;

/// Applies every pending migration.
///
/// A failed run counts as success when a concurrent opener has already
/// recorded every migration. Other failures are retried with backoff.
pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    let mut attempt = 1;
    loop {
        let error = match MIGRATOR.run(pool).await {
            Ok(()) => return Ok(()),
            Err(error) => error,
        };

        if schema_is_current(pool).await {
            debug!(
                event_name = "storage.migrations.already_applied",
                attempt,
                error = %error,
                "migrations applied by a concurrent opener"
            );
            return Ok(());
        }
        if attempt >= MIGRATION_ATTEMPTS {
            return Err(error);
        }

        debug!(
            event_name = "storage.migrations.retry",
            attempt,
            error = %error,
            "retrying migrations"
        );
        tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS * u64::from(attempt))).await;
        attempt += 1;
    }
}

async fn schema_is_current(pool: &DbPool) -> bool {
    let applied: Vec<i64> =
        match sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success = 1")
            .fetch_all(pool)
            .await
        {
            Ok(applied) => applied,
            Err(_) => return false,
        };

    MIGRATOR
        .iter()
        .filter(|migration| !migration.migration_type.is_down_migration())
        .all(|migration| applied.contains(&migration.version))
}
