use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{ConfigStore, StorageError};

/// Process-local settings store used by tests and dry runs.
#[derive(Default)]
pub struct InMemoryConfigStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryConfigStore {
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries.into_iter().map(|(key, value)| (key.into(), value.into())).collect();
        Self { entries: RwLock::new(entries) }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get(&self, key: &str, default: Option<&str>) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned().or_else(|| default.map(str::to_owned)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
