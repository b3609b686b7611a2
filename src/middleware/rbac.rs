// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        assets::Entity,
        permission::{Action, ModuleKey},
    },
    services::permission,
};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn module() -> ModuleKey;
    fn action() -> Action;
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let Ok(locale) = Locale::from_request_parts(parts, state).await;

        // A. Extrai Usuário (colocado lá pelo auth_guard)
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

        // B. Confere a grade (admin sempre passa)
        permission::ensure(&user.0, T::module(), T::action())
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

macro_rules! permission {
    ($name:ident, $module:expr, $action:expr) => {
        pub struct $name;
        impl PermissionDef for $name {
            fn module() -> ModuleKey { $module }
            fn action() -> Action { $action }
        }
    };
}

permission!(PermDashboardView, ModuleKey::Dashboard, Action::View);
permission!(PermStaffView, ModuleKey::Staff, Action::View);
permission!(PermStaffAdd, ModuleKey::Staff, Action::Add);
permission!(PermStaffEdit, ModuleKey::Staff, Action::Edit);
permission!(PermStaffDelete, ModuleKey::Staff, Action::Delete);
permission!(PermPermissionsEdit, ModuleKey::Permissions, Action::Edit);
permission!(PermUsageHistoryView, ModuleKey::UsageHistory, Action::View);

// Permissões das coleções genéricas: o módulo vem da própria entidade
macro_rules! entity_permission {
    ($name:ident, $action:expr) => {
        pub struct $name<E>(PhantomData<E>);
        impl<E: Entity> PermissionDef for $name<E> {
            fn module() -> ModuleKey { E::MODULE }
            fn action() -> Action { $action }
        }
    };
}

entity_permission!(ViewOf, Action::View);
entity_permission!(AddOf, Action::Add);
entity_permission!(EditOf, Action::Edit);
entity_permission!(DeleteOf, Action::Delete);
