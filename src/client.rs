// src/client.rs
//
// Núcleo do cliente do painel: sessão, coleções e notificações.
// Fala com o servidor por HTTP (rest) ou direto com os serviços (local).

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    common::{error::AppError, i18n::{I18nStore, DEFAULT_LANG}},
    models::{
        assets::Resource,
        auth::{AuthResponse, ChangePasswordPayload, User},
    },
};

pub mod collection_store;
pub mod local;
pub mod notifier;
pub mod rest;
pub mod session;

pub use collection_store::CollectionStore;
pub use local::LocalBackend;
pub use notifier::{Notifier, ToastCenter, ToastKind};
pub use rest::RestBackend;
pub use session::{PasswordChangeError, RouteDecision, SessionGate, SessionState};

// O que a tela de login sabe distinguir
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Serviço indisponível: {0}")]
    ServiceUnavailable(String),
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InvalidCredentials | AppError::InvalidToken => AuthError::InvalidCredentials,
            AppError::ServiceUnavailable(reason) => AuthError::ServiceUnavailable(reason),
            other => AuthError::ServiceUnavailable(other.to_string()),
        }
    }
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, identifier: &str, secret: &str) -> Result<AuthResponse, AppError>;

    async fn current_user(&self, token: &str) -> Result<User, AppError>;

    async fn change_password(&self, token: &str, payload: &ChangePasswordPayload) -> Result<(), AppError>;

    async fn logout(&self, token: &str) -> Result<(), AppError>;
}

/// Origem dos registros de uma coleção (`/api/{RESOURCE}` ou o armazenamento local).
#[async_trait]
pub trait CollectionSource<R: Resource>: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<R>, AppError>;

    async fn create(&self, item: &R) -> Result<R, AppError>;

    async fn update(&self, id: Uuid, item: &R) -> Result<R, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

// Títulos das notificações saem do mesmo catálogo do servidor
pub(crate) fn message(code: &str) -> String {
    I18nStore::default().translate(DEFAULT_LANG, code)
}

pub(crate) fn error_title(err: &AppError) -> String {
    message(err.code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_read_as_bad_credentials() {
        assert_eq!(AuthError::from(AppError::InvalidToken), AuthError::InvalidCredentials);
        assert_eq!(
            AuthError::from(AppError::ServiceUnavailable("connection refused".into())),
            AuthError::ServiceUnavailable("connection refused".into())
        );
        assert!(matches!(
            AuthError::from(AppError::NotFound("staff")),
            AuthError::ServiceUnavailable(_)
        ));
    }
}
