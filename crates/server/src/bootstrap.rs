use std::sync::Arc;

use modebot_core::config::{AppConfig, ConfigError, LoadOptions};
use modebot_db::{SqlConfigStore, StorageError};
use modebot_discord::{
    events::bot_dispatcher,
    gateway::{GatewayRunner, GatewayTransport, NoopGatewayTransport, ReconnectPolicy},
};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub store: Arc<SqlConfigStore>,
    pub gateway_runner: GatewayRunner,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("settings storage unavailable: {0}")]
    Storage(#[from] StorageError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    bootstrap_with_transport(config, Arc::new(NoopGatewayTransport)).await
}

pub async fn bootstrap_with_transport(
    config: AppConfig,
    transport: Arc<dyn GatewayTransport>,
) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let store = Arc::new(SqlConfigStore::initialize_with(&config.database).await?);
    info!(
        event_name = "system.bootstrap.storage_ready",
        correlation_id = "bootstrap",
        path = %config.database.path.display(),
        "settings storage initialized"
    );

    let gateway_runner = GatewayRunner::new(
        transport,
        bot_dispatcher(store.clone()),
        ReconnectPolicy::default(),
        config.discord.registration_scope(),
    );

    Ok(Application { config, store, gateway_runner })
}

#[cfg(test)]
mod tests {
    use modebot_core::config::{ConfigOverrides, LoadOptions, RegistrationScope};
    use modebot_db::ConfigStore;

    use crate::bootstrap::{bootstrap, BootstrapError};

    fn options(database_path: std::path::PathBuf, token: &str) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_path: Some(database_path),
                discord_token: Some(token.to_owned()),
                discord_guild_id: Some(987_654_321),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_without_discord_token() {
        let dir = tempfile::tempdir().expect("tempdir");
        let database_path = dir.path().join("data").join("bot.db");

        let result = bootstrap(options(database_path.clone(), "")).await;

        let error = result.err().expect("missing token should fail");
        assert!(matches!(error, BootstrapError::Config(_)));
        assert!(error.to_string().contains("discord.token"));
        assert!(!database_path.exists(), "storage must not be touched before config is valid");
    }

    #[tokio::test]
    async fn bootstrap_initializes_storage_and_scopes_registration() {
        let dir = tempfile::tempdir().expect("tempdir");
        let database_path = dir.path().join("nested").join("bot.db");

        let app = bootstrap(options(database_path.clone(), "test-token"))
            .await
            .expect("bootstrap should succeed with valid overrides");

        assert!(database_path.exists());
        assert_eq!(app.gateway_runner.scope(), RegistrationScope::Guild(987_654_321));
        assert_eq!(
            app.store.get("mode", Some("standard")).await.expect("read mode"),
            Some("standard".to_owned())
        );

        app.gateway_runner.start().await.expect("noop transport runs to completion");
        app.store.close().await;
    }
}
