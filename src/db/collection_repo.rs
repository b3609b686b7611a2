// src/db/collection_repo.rs

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::kv_store::{table_key, KeyValueStore},
    models::assets::Entity,
};

// O repositório de coleções: cada tabela é um array JSON numa chave do KeyValueStore.
// Toda escrita é um ciclo ler-modificar-gravar protegido pelo mesmo mutex,
// então duas requisições simultâneas não perdem a alteração uma da outra.
#[derive(Clone)]
pub struct CollectionRepository {
    store: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl CollectionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store, write_lock: Arc::new(Mutex::new(())) }
    }

    // ---
    // Primitivas por nome de tabela
    // ---

    pub async fn load<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, AppError> {
        match self.store.get(&table_key(table)).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<(), AppError> {
        let raw = serde_json::to_string(rows)?;
        self.store.put(&table_key(table), raw).await
    }

    /// Executa `f` sobre a tabela inteira e grava o resultado, tudo sob o mutex de escrita.
    /// Se `f` falhar nada é gravado.
    pub async fn modify<T, R, F>(&self, table: &str, f: F) -> Result<R, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> Result<R, AppError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.load::<T>(table).await?;
        let result = f(&mut rows)?;
        self.save(table, &rows).await?;
        Ok(result)
    }

    pub async fn is_empty(&self, table: &str) -> Result<bool, AppError> {
        Ok(self.store.get(&table_key(table)).await?.is_none_or(|raw| raw.trim() == "[]"))
    }

    // ---
    // Atalhos tipados para entidades
    // ---

    pub async fn list<E: Entity>(&self) -> Result<Vec<E>, AppError> {
        self.load(E::TABLE).await
    }

    pub async fn find<E: Entity>(&self, id: Uuid) -> Result<Option<E>, AppError> {
        Ok(self.list::<E>().await?.into_iter().find(|e| e.id() == id))
    }

    /// Insere o registro. Um id nulo é trocado por um novo UUID.
    pub async fn insert<E: Entity>(&self, mut entity: E) -> Result<E, AppError> {
        if entity.id().is_nil() {
            entity.set_id(Uuid::new_v4());
        }
        self.modify::<E, _, _>(E::TABLE, |rows| {
            rows.push(entity.clone());
            Ok(entity)
        })
        .await
    }

    pub async fn delete<E: Entity>(&self, id: Uuid) -> Result<E, AppError> {
        self.modify::<E, _, _>(E::TABLE, |rows| {
            let index = rows
                .iter()
                .position(|e| e.id() == id)
                .ok_or(AppError::NotFound(E::RESOURCE))?;
            Ok(rows.remove(index))
        })
        .await
    }
}
