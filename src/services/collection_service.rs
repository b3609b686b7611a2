// src/services/collection_service.rs

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        query::{ListQuery, SortOrder},
    },
    db::CollectionRepository,
    models::{
        assets::{Entity, UsageHistory},
        auth::User,
    },
};

// Regras de negócio das coleções planas (equipamentos, licenças, chamados...).
// Toda mutação bem-sucedida deixa um registro no histórico de uso.
#[derive(Clone)]
pub struct CollectionService {
    collections: CollectionRepository,
}

impl CollectionService {
    pub fn new(collections: CollectionRepository) -> Self {
        Self { collections }
    }

    pub async fn list<E: Entity>(&self, query: &ListQuery) -> Result<Vec<E>, AppError> {
        let items = self.collections.list::<E>().await?;
        Ok(query.apply(&items))
    }

    pub async fn get<E: Entity>(&self, id: Uuid) -> Result<E, AppError> {
        self.collections.find::<E>(id).await?.ok_or(AppError::NotFound(E::RESOURCE))
    }

    pub async fn create<E: Entity>(&self, actor: &User, mut entity: E) -> Result<E, AppError> {
        entity.validate()?;
        // O id é sempre do servidor
        entity.set_id(Uuid::new_v4());
        entity.touch(Utc::now());

        let created = self.collections.insert(entity).await?;
        tracing::info!("➕ {} criou {} {}", actor.employee_id, E::RESOURCE, created.id());

        self.record_usage(actor, "create", created.label(), E::RESOURCE).await;
        Ok(created)
    }

    /// Atualização parcial: os campos presentes em `patch` sobrescrevem os gravados.
    pub async fn update<E: Entity>(&self, actor: &User, id: Uuid, patch: Map<String, Value>) -> Result<E, AppError> {
        let updated = self
            .collections
            .modify::<E, _, _>(E::TABLE, |rows| {
                let index = rows
                    .iter()
                    .position(|e| e.id() == id)
                    .ok_or(AppError::NotFound(E::RESOURCE))?;

                let mut merged = serde_json::to_value(&rows[index])?;
                if let Value::Object(fields) = &mut merged {
                    for (key, value) in patch {
                        if key != "id" {
                            fields.insert(key, value);
                        }
                    }
                }

                let mut entity: E = serde_json::from_value(merged)?;
                entity.validate()?;
                entity.set_id(id);
                entity.touch(Utc::now());

                rows[index] = entity.clone();
                Ok(entity)
            })
            .await?;

        tracing::info!("✏️ {} alterou {} {}", actor.employee_id, E::RESOURCE, id);
        self.record_usage(actor, "update", updated.label(), E::RESOURCE).await;
        Ok(updated)
    }

    pub async fn delete<E: Entity>(&self, actor: &User, id: Uuid) -> Result<E, AppError> {
        let removed = self.collections.delete::<E>(id).await?;
        tracing::info!("🗑️ {} excluiu {} {}", actor.employee_id, E::RESOURCE, id);

        self.record_usage(actor, "delete", removed.label(), E::RESOURCE).await;
        Ok(removed)
    }

    /// Sem ordenação pedida, os mais recentes vêm primeiro.
    pub async fn usage_history(&self, query: &ListQuery) -> Result<Vec<UsageHistory>, AppError> {
        let query = match query.sort {
            Some(_) => query.clone(),
            None => query.clone().sorted_by("timestamp", SortOrder::Desc),
        };
        self.list::<UsageHistory>(&query).await
    }

    // Falhar ao gravar o histórico não desfaz a operação principal
    pub async fn record_usage(&self, actor: &User, action: &str, asset: String, details: &str) {
        let entry = UsageHistory {
            id: Uuid::new_v4(),
            timestamp: Some(Utc::now()),
            user: actor.full_name.clone(),
            action: action.to_string(),
            asset,
            details: details.to_string(),
        };

        if let Err(e) = self.collections.insert(entry).await {
            tracing::warn!("⚠️ Falha ao gravar o histórico de uso: {:?}", e);
        }
    }
}
