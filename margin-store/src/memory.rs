use std::collections::HashMap;

use async_trait::async_trait;
use margin_core::{PreferenceStore, StoreError};
use tokio::sync::RwLock;

/// Process-local store. Values vanish when the process exits.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn starts_empty() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.get("kra-ready-theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn seeded_values_are_readable() {
        let store = MemoryPreferenceStore::with_values([("kra-ready-theme", "light")]);
        assert_eq!(
            store.get("kra-ready-theme").await.unwrap().as_deref(),
            Some("light")
        );
    }

    #[tokio::test]
    async fn set_overwrites() {
        let store = MemoryPreferenceStore::with_values([("kra-ready-theme", "light")]);

        store.set("kra-ready-theme", "system").await.unwrap();

        assert_eq!(
            store.get("kra-ready-theme").await.unwrap().as_deref(),
            Some("system")
        );
    }
}
