use crate::commands::{prepare, CommandResult};
use modebot_core::{Mode, MODE_KEY};
use modebot_db::{ConfigStore, SqlConfigStore, StorageError};

/// Prints the stored mode, or stores `value` after validating it.
pub fn run(value: Option<&str>) -> CommandResult {
    let requested = match value.map(str::parse::<Mode>).transpose() {
        Ok(requested) => requested,
        Err(error) => return CommandResult::failure("mode", "invalid_mode", error.to_string(), 2),
    };

    let (config, runtime) = match prepare("mode") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let store = SqlConfigStore::initialize_with(&config.database).await?;
        if let Some(mode) = requested {
            store.set(MODE_KEY, mode.as_str()).await?;
        }
        let fallback = Mode::default().as_str();
        let current = store.get(MODE_KEY, Some(fallback)).await?;
        store.close().await;
        Ok::<String, StorageError>(current.unwrap_or_else(|| fallback.to_owned()))
    });

    match result {
        Ok(current) if requested.is_some() => {
            CommandResult::success("mode", format!("mode set to {current}"))
        }
        Ok(current) => CommandResult::success("mode", format!("current mode: {current}")),
        Err(error) => CommandResult::failure("mode", "storage", error.to_string(), 4),
    }
}
