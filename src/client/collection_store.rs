// src/client/collection_store.rs

use std::{marker::PhantomData, sync::Arc};
use uuid::Uuid;

use crate::{
    client::{error_title, message, notifier::{Notifier, ToastKind}, CollectionSource},
    common::{error::AppError, query::ListQuery},
    models::assets::Resource,
};

// ---
// Cópia local de uma coleção
// ---
// Pessimista: a lista só muda depois que a origem confirma.
// Sem versionamento; a última gravação vale.
pub struct CollectionStore<R: Resource, S: CollectionSource<R>> {
    source: S,
    notifier: Arc<dyn Notifier>,
    items: Vec<R>,
    loading: bool,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, S: CollectionSource<R>> CollectionStore<R, S> {
    pub fn new(source: S, notifier: Arc<dyn Notifier>) -> Self {
        Self { source, notifier, items: Vec::new(), loading: false, _resource: PhantomData }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn find(&self, id: Uuid) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn filtered(&self, query: &ListQuery) -> Vec<R> {
        query.apply(&self.items)
    }

    fn fail(&self, err: AppError) -> AppError {
        tracing::warn!("⚠️ [{}] {}", R::RESOURCE, err);
        self.notifier.show(&error_title(&err), ToastKind::Error);
        err
    }

    /// Substitui a lista inteira pelo que a origem devolver.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        self.loading = true;
        let result = self.source.fetch_all().await;
        self.loading = false;

        match result {
            Ok(items) => {
                tracing::debug!("🔄 [{}] {} registros", R::RESOURCE, items.len());
                self.items = items;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn create(&mut self, item: R) -> Result<R, AppError> {
        let created = self.source.create(&item).await.map_err(|e| self.fail(e))?;
        self.items.push(created.clone());
        self.notifier.show(&message("RECORD_CREATED"), ToastKind::Success);
        Ok(created)
    }

    pub async fn update(&mut self, id: Uuid, item: R) -> Result<R, AppError> {
        let Some(index) = self.items.iter().position(|i| i.id() == id) else {
            return Err(self.fail(AppError::NotFound(R::RESOURCE)));
        };

        let updated = self.source.update(id, &item).await.map_err(|e| self.fail(e))?;
        self.items[index] = updated.clone();
        self.notifier.show(&message("RECORD_UPDATED"), ToastKind::Success);
        Ok(updated)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<(), AppError> {
        let Some(index) = self.items.iter().position(|i| i.id() == id) else {
            return Err(self.fail(AppError::NotFound(R::RESOURCE)));
        };

        self.source.delete(id).await.map_err(|e| self.fail(e))?;
        self.items.remove(index);
        self.notifier.show(&message("RECORD_DELETED"), ToastKind::Success);
        Ok(())
    }
}
