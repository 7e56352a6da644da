use crate::commands::{prepare, CommandResult};
use modebot_db::SqlConfigStore;

pub fn run() -> CommandResult {
    let (config, runtime) = match prepare("migrate") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let store = SqlConfigStore::initialize_with(&config.database).await?;
        store.close().await;
        Ok::<(), modebot_db::StorageError>(())
    });

    match result {
        Ok(()) => CommandResult::success(
            "migrate",
            format!("settings storage ready at `{}`", config.database.path.display()),
        ),
        Err(error) => CommandResult::failure("migrate", "storage", error.to_string(), 4),
    }
}
