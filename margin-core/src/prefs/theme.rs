//! Theme preference service.
//!
//! The service owns the current [`ThemeMode`], persists every change under
//! [`THEME_STORAGE_KEY`] and publishes it on a watch channel. `System` is
//! resolved against a [`SystemAppearance`] only when the effective look is
//! asked for.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::store::{PreferenceStore, StoreError};
use crate::models::{Appearance, ThemeMode};

pub const THEME_STORAGE_KEY: &str = "kra-ready-theme";

/// Desktop colour-scheme lookup.
pub trait SystemAppearance: Send + Sync {
    fn detect(&self) -> Appearance;
}

/// Always reports the same appearance.
#[derive(Debug, Clone, Copy)]
pub struct FixedAppearance(pub Appearance);

impl SystemAppearance for FixedAppearance {
    fn detect(&self) -> Appearance {
        self.0
    }
}

pub struct ThemeService {
    store: Arc<dyn PreferenceStore>,
    appearance: Arc<dyn SystemAppearance>,
    mode: watch::Sender<ThemeMode>,
}

impl ThemeService {
    /// Reads the stored preference. A missing or unreadable value starts the
    /// service in `System`.
    pub async fn load(
        store: Arc<dyn PreferenceStore>,
        appearance: Arc<dyn SystemAppearance>,
    ) -> Self {
        let stored = match store.get(THEME_STORAGE_KEY).await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "failed to read theme preference; using system");
                None
            }
        };
        let mode = ThemeMode::from_stored(stored.as_deref());
        debug!(%mode, "theme preference loaded");

        let (mode, _) = watch::channel(mode);
        Self {
            store,
            appearance,
            mode,
        }
    }

    pub fn get(&self) -> ThemeMode {
        *self.mode.borrow()
    }

    /// Persists `mode` and then publishes it. Nothing changes when the
    /// write fails.
    pub async fn set(
        &self,
        mode: ThemeMode,
    ) -> Result<(), StoreError> {
        self.store.set(THEME_STORAGE_KEY, mode.as_str()).await?;
        self.mode.send_replace(mode);
        info!(%mode, "theme changed");
        Ok(())
    }

    /// Moves to the next mode in the dark, light, system cycle.
    pub async fn toggle(&self) -> Result<ThemeMode, StoreError> {
        let next = self.get().next();
        self.set(next).await?;
        Ok(next)
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeMode> {
        self.mode.subscribe()
    }

    /// The look to render with, `System` resolved against the desktop.
    pub fn effective(&self) -> Appearance {
        self.get().resolve(self.appearance.detect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct MapStore {
        values: Mutex<HashMap<String, String>>,
        fail_writes: bool,
    }

    impl MapStore {
        fn with(value: &str) -> Self {
            let store = Self::default();
            store
                .values
                .lock()
                .unwrap()
                .insert(THEME_STORAGE_KEY.to_string(), value.to_string());
            store
        }

        fn stored(&self) -> Option<String> {
            self.values.lock().unwrap().get(THEME_STORAGE_KEY).cloned()
        }
    }

    #[async_trait]
    impl PreferenceStore for MapStore {
        async fn get(
            &self,
            key: &str,
        ) -> Result<Option<String>, StoreError> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(
            &self,
            key: &str,
            value: &str,
        ) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::Storage("read-only".to_string()));
            }
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl PreferenceStore for BrokenStore {
        async fn get(
            &self,
            _key: &str,
        ) -> Result<Option<String>, StoreError> {
            Err(StoreError::Connection("gone".to_string()))
        }

        async fn set(
            &self,
            _key: &str,
            _value: &str,
        ) -> Result<(), StoreError> {
            Err(StoreError::Connection("gone".to_string()))
        }
    }

    async fn service(store: Arc<MapStore>) -> ThemeService {
        ThemeService::load(store, Arc::new(FixedAppearance(Appearance::Light))).await
    }

    #[tokio::test]
    async fn empty_store_starts_in_system() {
        let svc = service(Arc::new(MapStore::default())).await;
        assert_eq!(svc.get(), ThemeMode::System);
    }

    #[tokio::test]
    async fn stored_value_is_restored() {
        let svc = service(Arc::new(MapStore::with("dark"))).await;
        assert_eq!(svc.get(), ThemeMode::Dark);
    }

    #[tokio::test]
    async fn unknown_stored_value_reads_as_system() {
        let svc = service(Arc::new(MapStore::with("sepia"))).await;
        assert_eq!(svc.get(), ThemeMode::System);
    }

    #[tokio::test]
    async fn unreadable_store_starts_in_system() {
        let svc = ThemeService::load(
            Arc::new(BrokenStore),
            Arc::new(FixedAppearance(Appearance::Dark)),
        )
        .await;
        assert_eq!(svc.get(), ThemeMode::System);
    }

    #[tokio::test]
    async fn set_persists_under_fixed_key() {
        let store = Arc::new(MapStore::default());
        let svc = service(store.clone()).await;

        svc.set(ThemeMode::Light).await.unwrap();

        assert_eq!(svc.get(), ThemeMode::Light);
        assert_eq!(store.stored().as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_mode() {
        let store = Arc::new(MapStore {
            fail_writes: true,
            ..MapStore::default()
        });
        let svc = service(store).await;

        let result = svc.set(ThemeMode::Dark).await;

        assert_eq!(result, Err(StoreError::Storage("read-only".to_string())));
        assert_eq!(svc.get(), ThemeMode::System);
    }

    #[tokio::test]
    async fn toggle_cycles_dark_light_system() {
        let store = Arc::new(MapStore::with("dark"));
        let svc = service(store.clone()).await;

        assert_eq!(svc.toggle().await.unwrap(), ThemeMode::Light);
        assert_eq!(svc.toggle().await.unwrap(), ThemeMode::System);
        assert_eq!(svc.toggle().await.unwrap(), ThemeMode::Dark);
        assert_eq!(store.stored().as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let svc = service(Arc::new(MapStore::default())).await;
        let mut rx = svc.subscribe();

        svc.set(ThemeMode::Dark).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ThemeMode::Dark);
    }

    #[tokio::test]
    async fn effective_resolves_system_against_desktop() {
        let svc = ThemeService::load(
            Arc::new(MapStore::default()),
            Arc::new(FixedAppearance(Appearance::Dark)),
        )
        .await;
        assert_eq!(svc.effective(), Appearance::Dark);

        svc.set(ThemeMode::Light).await.unwrap();
        assert_eq!(svc.effective(), Appearance::Light);
    }
}
