use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Connection error: {0}")]
    Connection(String),

    /// The requested backend is unknown or its configuration is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Key/value storage for small user preferences.
///
/// Values are opaque strings; interpreting them is up to the caller.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError>;

    /// Insert or overwrite `key`.
    async fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError>;
}
