// src/db/kv_store.rs

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::{collections::HashMap, time::Duration};
use tokio::sync::RwLock;

use crate::common::error::AppError;

/// Prefixo de todas as chaves gravadas.
pub const KEY_PREFIX: &str = "it_management_";

pub fn table_key(table: &str) -> String {
    format!("{KEY_PREFIX}{table}")
}

// O colaborador de persistência: chave -> texto (arrays JSON serializados).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn put(&self, key: &str, value: String) -> Result<(), AppError>;
}

// ---
// Em memória (usado quando não há DATABASE_URL, e nos testes)
// ---
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<(), AppError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

// ---
// SQLite via sqlx
// ---
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Conecta e roda as migrações embutidas.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        // Com ":memory:" cada conexão seria um banco diferente
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, AppError> {
        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.into()))?;

        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
        Ok(Self { pool })
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: String) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn exercise(store: &dyn KeyValueStore) {
        let key = table_key("equipment");
        assert_eq!(store.get(&key).await.unwrap(), None);

        store.put(&key, "[1]".into()).await.unwrap();
        store.put(&key, "[1,2]".into()).await.unwrap();

        assert_eq!(store.get(&key).await.unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(store.get(&table_key("staff")).await.unwrap(), None);
    }

    #[test]
    fn keys_use_the_table_prefix() {
        assert_eq!(table_key("equipment_types"), "it_management_equipment_types");
    }

    #[tokio::test]
    async fn memory_store_overwrites_values() {
        exercise(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn sqlite_store_upserts_values() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        exercise(&store).await;
    }
}
