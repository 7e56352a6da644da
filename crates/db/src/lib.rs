pub mod connection;
pub mod migrations;
pub mod repositories;

pub use connection::{connect_with_settings, open_storage, DbPool};
pub use repositories::{ConfigStore, InMemoryConfigStore, SqlConfigStore, StorageError};
