// src/client/local.rs
//
// Backend sem servidor: as mesmas regras da API, chamadas direto nos serviços.

use async_trait::async_trait;
use serde_json::Value;
use std::marker::PhantomData;
use uuid::Uuid;

use crate::{
    client::{AuthBackend, CollectionSource},
    common::{error::AppError, query::ListQuery},
    config::AppState,
    models::{
        assets::Entity,
        auth::{AuthResponse, ChangePasswordPayload, CreateStaffPayload, UpdateStaffPayload, User},
        permission::{Action, ModuleKey},
    },
    services::permission,
};

#[derive(Clone)]
pub struct LocalBackend {
    app_state: AppState,
}

impl LocalBackend {
    pub fn new(app_state: AppState) -> Self {
        Self { app_state }
    }

    pub fn collection<E: Entity>(&self, token: impl Into<String>) -> LocalCollection<E> {
        LocalCollection { backend: self.clone(), token: token.into(), _entity: PhantomData }
    }

    pub fn staff(&self, token: impl Into<String>) -> LocalStaffSource {
        LocalStaffSource { backend: self.clone(), token: token.into() }
    }

    // Mesmo caminho do servidor: token, troca de senha pendente, grade
    async fn actor(&self, token: &str, module: ModuleKey, action: Action) -> Result<User, AppError> {
        let session = self.app_state.auth_service.validate_token(token).await?;
        if session.user.must_change_password {
            return Err(AppError::PasswordChangeRequired);
        }
        permission::ensure(&session.user, module, action)?;
        Ok(session.user)
    }
}

#[async_trait]
impl AuthBackend for LocalBackend {
    async fn login(&self, identifier: &str, secret: &str) -> Result<AuthResponse, AppError> {
        self.app_state.auth_service.login(identifier, secret).await
    }

    async fn current_user(&self, token: &str) -> Result<User, AppError> {
        Ok(self.app_state.auth_service.validate_token(token).await?.user)
    }

    async fn change_password(&self, token: &str, payload: &ChangePasswordPayload) -> Result<(), AppError> {
        let session = self.app_state.auth_service.validate_token(token).await?;
        self.app_state.auth_service.change_password(session.user.id, payload).await?;
        Ok(())
    }

    async fn logout(&self, token: &str) -> Result<(), AppError> {
        let session = self.app_state.auth_service.validate_token(token).await?;
        self.app_state.auth_service.logout(session.jti, session.expires_at).await;
        Ok(())
    }
}

pub struct LocalCollection<E: Entity> {
    backend: LocalBackend,
    token: String,
    _entity: PhantomData<fn() -> E>,
}

#[async_trait]
impl<E: Entity> CollectionSource<E> for LocalCollection<E> {
    async fn fetch_all(&self) -> Result<Vec<E>, AppError> {
        self.backend.actor(&self.token, E::MODULE, Action::View).await?;
        self.backend.app_state.collection_service.list::<E>(&ListQuery::default()).await
    }

    async fn create(&self, item: &E) -> Result<E, AppError> {
        let actor = self.backend.actor(&self.token, E::MODULE, Action::Add).await?;
        self.backend.app_state.collection_service.create(&actor, item.clone()).await
    }

    async fn update(&self, id: Uuid, item: &E) -> Result<E, AppError> {
        let actor = self.backend.actor(&self.token, E::MODULE, Action::Edit).await?;
        let Value::Object(patch) = serde_json::to_value(item)? else {
            return Err(anyhow::anyhow!("{} não serializa como objeto", E::RESOURCE).into());
        };
        self.backend.app_state.collection_service.update::<E>(&actor, id, patch).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let actor = self.backend.actor(&self.token, E::MODULE, Action::Delete).await?;
        self.backend.app_state.collection_service.delete::<E>(&actor, id).await?;
        Ok(())
    }
}

// Funcionários não são uma coleção plana: passam pelo StaffService
pub struct LocalStaffSource {
    backend: LocalBackend,
    token: String,
}

#[async_trait]
impl CollectionSource<User> for LocalStaffSource {
    async fn fetch_all(&self) -> Result<Vec<User>, AppError> {
        self.backend.actor(&self.token, ModuleKey::Staff, Action::View).await?;
        self.backend.app_state.staff_service.list(&ListQuery::default()).await
    }

    async fn create(&self, item: &User) -> Result<User, AppError> {
        let actor = self.backend.actor(&self.token, ModuleKey::Staff, Action::Add).await?;
        let payload = CreateStaffPayload {
            employee_id: item.employee_id.clone(),
            full_name: item.full_name.clone(),
            email: item.email.clone(),
            phone: item.phone.clone(),
            unit: item.unit.clone(),
            position: item.position.clone(),
            join_date: item.join_date,
            status: item.status,
            role: item.role,
            gender: item.gender,
            permissions: Some(item.permissions.clone()),
        };
        self.backend.app_state.staff_service.create(&actor, payload).await
    }

    async fn update(&self, id: Uuid, item: &User) -> Result<User, AppError> {
        let actor = self.backend.actor(&self.token, ModuleKey::Staff, Action::Edit).await?;
        let payload = UpdateStaffPayload {
            employee_id: Some(item.employee_id.clone()),
            full_name: Some(item.full_name.clone()),
            email: Some(item.email.clone()),
            phone: Some(item.phone.clone()),
            unit: Some(item.unit.clone()),
            position: Some(item.position.clone()),
            join_date: item.join_date,
            status: Some(item.status),
            role: Some(item.role),
            gender: Some(item.gender),
            permissions: Some(item.permissions.clone()),
        };
        self.backend.app_state.staff_service.update(&actor, id, payload).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let actor = self.backend.actor(&self.token, ModuleKey::Staff, Action::Delete).await?;
        self.backend.app_state.staff_service.delete(&actor, id).await?;
        Ok(())
    }
}
