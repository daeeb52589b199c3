use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use margin_core::{PreferenceStore, StoreError};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

pub const IN_MEMORY: &str = ":memory:";

pub struct SqlitePreferenceStore {
    pool: SqlitePool,
}

impl SqlitePreferenceStore {
    /// Opens `connection_string`, creating the database file if needed.
    ///
    /// Accepts a bare path (`kra-ready.db`), a sqlx URL
    /// (`sqlite://kra-ready.db`) or `:memory:`. An in-memory database lives
    /// as long as its single pooled connection.
    pub async fn connect(connection_string: &str) -> Result<Self, StoreError> {
        let pool = if connection_string == IN_MEMORY {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect("sqlite::memory:")
                .await
        } else {
            let options = if connection_string.starts_with("sqlite:") {
                SqliteConnectOptions::from_str(connection_string)
                    .map_err(|e| StoreError::Configuration(e.to_string()))?
            } else {
                SqliteConnectOptions::new().filename(connection_string)
            };
            SqlitePoolOptions::new()
                .connect_with(options.create_if_missing(true))
                .await
        }
        .map_err(|e| {
            StoreError::Connection(format!("failed to open '{connection_string}': {e}"))
        })?;

        debug!(connection_string, "preference database opened");
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("migration failed: {e}")))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PreferenceStore for SqlitePreferenceStore {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT value FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        row.map(|row| row.try_get::<String, _>("value"))
            .transpose()
            .map_err(|e| StoreError::Storage(e.to_string()))
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO preferences (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?;

        debug!(key, value, "preference stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    async fn setup_test_db() -> SqlitePreferenceStore {
        let store = SqlitePreferenceStore::connect(IN_MEMORY)
            .await
            .expect("Failed to create in-memory database");
        store
            .run_migrations()
            .await
            .expect("Failed to run migrations");
        store
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let store = setup_test_db().await;
        assert_eq!(store.get("kra-ready-theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store = setup_test_db().await;

        store.set("kra-ready-theme", "dark").await.unwrap();

        assert_eq!(
            store.get("kra-ready-theme").await.unwrap().as_deref(),
            Some("dark")
        );
    }

    #[tokio::test]
    async fn set_overwrites_existing_value() {
        let store = setup_test_db().await;

        store.set("kra-ready-theme", "dark").await.unwrap();
        store.set("kra-ready-theme", "light").await.unwrap();

        assert_eq!(
            store.get("kra-ready-theme").await.unwrap().as_deref(),
            Some("light")
        );
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM preferences")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let store = setup_test_db().await;

        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();

        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let store = setup_test_db().await;
        store.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn query_before_migrations_is_a_storage_error() {
        let store = SqlitePreferenceStore::connect(IN_MEMORY).await.unwrap();

        assert!(matches!(
            store.get("kra-ready-theme").await,
            Err(StoreError::Storage(_))
        ));
    }
}
