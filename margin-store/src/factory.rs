use std::sync::Arc;

use async_trait::async_trait;
use margin_core::prefs::StoreFactory;
use margin_core::{PreferenceStore, StoreConfig, StoreError, StoreRegistry};

use crate::memory::MemoryPreferenceStore;
use crate::sqlite::SqlitePreferenceStore;

/// [`StoreFactory`] for SQLite.
///
/// ```rust,no_run
/// use margin_core::StoreRegistry;
/// use margin_store::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens `config.connection_string` (a file path or `:memory:`) and
    /// brings the schema up to date.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Arc<dyn PreferenceStore>, StoreError> {
        let store = SqlitePreferenceStore::connect(&config.connection_string).await?;
        store.run_migrations().await?;
        Ok(Arc::new(store))
    }
}

/// [`StoreFactory`] for [`MemoryPreferenceStore`]. The connection string is
/// ignored.
pub struct MemoryStoreFactory;

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Arc<dyn PreferenceStore>, StoreError> {
        Ok(Arc::new(MemoryPreferenceStore::new()))
    }
}

/// Registers every backend this crate provides.
pub fn register_builtin_backends(registry: &mut StoreRegistry) {
    registry.register(Box::new(SqliteStoreFactory));
    registry.register(Box::new(MemoryStoreFactory));
}
