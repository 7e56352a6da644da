use std::sync::Arc;

use modebot_core::{Mode, MODE_KEY};
use modebot_db::{ConfigStore, StorageError};
use tracing::info;

/// Typed access to the bot's persisted settings.
#[derive(Clone)]
pub struct BotSettings {
    store: Arc<dyn ConfigStore>,
}

impl BotSettings {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Stored mode as written, falling back to `standard` when unset.
    pub async fn current_mode(&self) -> Result<String, StorageError> {
        let fallback = Mode::default().as_str();
        let stored = self.store.get(MODE_KEY, Some(fallback)).await?;
        Ok(stored.unwrap_or_else(|| fallback.to_owned()))
    }

    pub async fn set_mode(&self, mode: Mode, correlation_id: &str) -> Result<(), StorageError> {
        self.store.set(MODE_KEY, mode.as_str()).await?;
        info!(
            event_name = "config.mode.updated",
            correlation_id,
            mode = mode.as_str(),
            "bot mode updated"
        );
        Ok(())
    }
}
