// src/client/session.rs

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

use crate::{
    client::{error_title, message, notifier::{Notifier, ToastKind}, AuthBackend, AuthError},
    common::error::AppError,
    models::auth::{check_new_password, ChangePasswordPayload, User},
    services::navigation::{normalize_path, route_allowed, CHANGE_PASSWORD_PATH, LOGIN_PATH},
};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated { user: User, must_change: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToLogin,
    RedirectToPasswordChange,
    Forbidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordChangeError {
    #[error("A confirmação da senha não confere")]
    Mismatch,

    #[error("A nova senha é curta demais")]
    TooShort,

    #[error("Nenhuma sessão ativa")]
    NotAuthenticated,

    #[error("Troca recusada: {0}")]
    Rejected(AuthError),
}

// ---
// Portão de autenticação do cliente
// ---
// Anonymous -> Authenticating -> Authenticated { must_change }; logout volta a Anonymous.
// Enquanto must_change for true, só a tela de troca de senha abre.
pub struct SessionGate<B: AuthBackend> {
    backend: B,
    notifier: Arc<dyn Notifier>,
    token: Option<String>,
    state: watch::Sender<SessionState>,
}

impl<B: AuthBackend> SessionGate<B> {
    pub fn new(backend: B, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(SessionState::Anonymous);
        Self { backend, notifier, token: None, state }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<User> {
        match &*self.state.borrow() {
            SessionState::Authenticated { user, .. } => Some(user.clone()),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn set_state(&self, next: SessionState) {
        self.state.send_replace(next);
    }

    fn authenticated(&self, user: User) {
        let must_change = user.must_change_password;
        self.set_state(SessionState::Authenticated { user, must_change });
    }

    /// Uma tentativa só, sem repetir. Em caso de falha: uma notificação e volta a Anonymous.
    pub async fn login(&mut self, identifier: &str, secret: &str) -> Result<User, AuthError> {
        self.token = None;
        self.set_state(SessionState::Authenticating);

        match self.backend.login(identifier, secret).await {
            Ok(auth) => {
                tracing::info!("🔑 Sessão aberta para {}", auth.user.employee_id);
                self.token = Some(auth.token);
                self.authenticated(auth.user.clone());
                Ok(auth.user)
            }
            Err(e) => {
                let title = error_title(&e);
                let err = AuthError::from(e);
                tracing::info!("🔒 Login recusado para '{}': {}", identifier, err);
                self.notifier.show(&title, ToastKind::Error);
                self.set_state(SessionState::Anonymous);
                Err(err)
            }
        }
    }

    pub async fn change_password(
        &mut self,
        current_secret: &str,
        new_secret: &str,
        confirm_secret: &str,
    ) -> Result<(), PasswordChangeError> {
        if let Err(e) = check_new_password(new_secret, confirm_secret) {
            self.notifier.show(&error_title(&e), ToastKind::Error);
            return Err(match e {
                AppError::PasswordMismatch => PasswordChangeError::Mismatch,
                _ => PasswordChangeError::TooShort,
            });
        }

        let (Some(token), Some(user)) = (self.token.clone(), self.user()) else {
            self.notifier.show(&error_title(&AppError::InvalidToken), ToastKind::Error);
            return Err(PasswordChangeError::NotAuthenticated);
        };

        let payload = ChangePasswordPayload {
            current_secret: current_secret.to_string(),
            new_secret: new_secret.to_string(),
            confirm_secret: confirm_secret.to_string(),
        };

        if let Err(e) = self.backend.change_password(&token, &payload).await {
            self.notifier.show(&error_title(&e), ToastKind::Error);
            return Err(PasswordChangeError::Rejected(e.into()));
        }

        // A senha já mudou; se a releitura falhar, segue com a cópia local sem a pendência
        let refreshed = match self.backend.current_user(&token).await {
            Ok(fresh) => fresh,
            Err(e) => {
                tracing::warn!("⚠️ Falha ao reler o usuário após a troca de senha: {}", e);
                User { must_change_password: false, ..user }
            }
        };

        tracing::info!("🔐 Senha trocada por {}", refreshed.employee_id);
        self.authenticated(refreshed);
        self.notifier.show(&message("PASSWORD_CHANGED"), ToastKind::Success);
        Ok(())
    }

    /// Sempre termina em Anonymous; o logout no servidor é só uma tentativa.
    pub async fn logout(&mut self) {
        if let Some(token) = self.token.take() {
            if let Err(e) = self.backend.logout(&token).await {
                tracing::warn!("⚠️ Logout no servidor falhou: {}", e);
            }
        }
        self.set_state(SessionState::Anonymous);
    }

    pub fn guard(&self, path: &str) -> RouteDecision {
        let path = normalize_path(path);

        match &*self.state.borrow() {
            SessionState::Anonymous | SessionState::Authenticating => {
                if path == LOGIN_PATH {
                    RouteDecision::Allow
                } else {
                    RouteDecision::RedirectToLogin
                }
            }
            SessionState::Authenticated { must_change: true, .. } => {
                if path == CHANGE_PASSWORD_PATH {
                    RouteDecision::Allow
                } else {
                    RouteDecision::RedirectToPasswordChange
                }
            }
            SessionState::Authenticated { user, .. } => {
                if route_allowed(Some(user), path) {
                    RouteDecision::Allow
                } else {
                    RouteDecision::Forbidden
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::notifier::ToastCenter,
        models::{
            auth::AuthResponse,
            permission::{Action, ModuleKey, ModulePermissions, PermissionGrid, Role},
        },
        services::permission::tests::user_with,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    // Backend de mentira: uma conta só
    struct FakeBackend {
        user: Mutex<User>,
        secret: Mutex<String>,
        online: bool,
    }

    impl FakeBackend {
        fn new(user: User) -> Self {
            Self { user: Mutex::new(user), secret: Mutex::new("123456".into()), online: true }
        }

        fn up(&self) -> Result<(), AppError> {
            if self.online { Ok(()) } else { Err(AppError::ServiceUnavailable("offline".into())) }
        }
    }

    #[async_trait]
    impl AuthBackend for FakeBackend {
        async fn login(&self, identifier: &str, secret: &str) -> Result<AuthResponse, AppError> {
            self.up()?;
            let user = self.user.lock().unwrap().clone();
            if identifier != user.employee_id || secret != *self.secret.lock().unwrap() {
                return Err(AppError::InvalidCredentials);
            }
            Ok(AuthResponse { token: "token".into(), user })
        }

        async fn current_user(&self, _token: &str) -> Result<User, AppError> {
            self.up()?;
            Ok(self.user.lock().unwrap().clone())
        }

        async fn change_password(&self, _token: &str, payload: &ChangePasswordPayload) -> Result<(), AppError> {
            self.up()?;
            if payload.current_secret != *self.secret.lock().unwrap() {
                return Err(AppError::InvalidCredentials);
            }
            *self.secret.lock().unwrap() = payload.new_secret.clone();
            self.user.lock().unwrap().must_change_password = false;
            Ok(())
        }

        async fn logout(&self, _token: &str) -> Result<(), AppError> {
            self.up()
        }
    }

    fn employee(must_change: bool) -> User {
        let grid = PermissionGrid::deny_all()
            .with(ModuleKey::Dashboard, ModulePermissions::VIEW_ONLY)
            .with(ModuleKey::Equipment, ModulePermissions::VIEW_ONLY);
        User { employee_id: "NV001".into(), must_change_password: must_change, ..user_with(Role::Employee, grid) }
    }

    fn gate(user: User) -> (SessionGate<FakeBackend>, Arc<ToastCenter>) {
        let toasts = Arc::new(ToastCenter::new());
        (SessionGate::new(FakeBackend::new(user), toasts.clone()), toasts)
    }

    #[tokio::test]
    async fn wrong_secret_leaves_the_session_anonymous() {
        let (mut gate, toasts) = gate(employee(false));

        let err = gate.login("NV001", "wrong-secret").await.unwrap_err();

        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(gate.state(), SessionState::Anonymous);
        assert!(gate.token().is_none());
        assert_eq!(toasts.count(ToastKind::Error), 1);
    }

    #[tokio::test]
    async fn unreachable_backend_is_reported_as_unavailable() {
        let (mut gate, toasts) = gate(employee(false));
        gate.backend.online = false;

        let err = gate.login("NV001", "123456").await.unwrap_err();

        assert!(matches!(err, AuthError::ServiceUnavailable(_)));
        assert_eq!(gate.state(), SessionState::Anonymous);
        assert_eq!(toasts.count(ToastKind::Error), 1);
    }

    #[tokio::test]
    async fn pending_password_change_redirects_everything_else() {
        let (mut gate, _) = gate(employee(true));
        gate.login("NV001", "123456").await.unwrap();

        assert_eq!(gate.guard("/dashboard"), RouteDecision::RedirectToPasswordChange);
        assert_eq!(gate.guard("/equipment?page=2"), RouteDecision::RedirectToPasswordChange);
        assert_eq!(gate.guard(CHANGE_PASSWORD_PATH), RouteDecision::Allow);
    }

    #[tokio::test]
    async fn password_rules_are_checked_before_the_backend() {
        let (mut gate, toasts) = gate(employee(true));
        gate.login("NV001", "123456").await.unwrap();
        let before = gate.state();

        assert_eq!(gate.change_password("123456", "abc", "abc").await, Err(PasswordChangeError::TooShort));
        assert_eq!(
            gate.change_password("123456", "newpass1", "newpass2").await,
            Err(PasswordChangeError::Mismatch)
        );
        assert_eq!(gate.state(), before);
        assert_eq!(toasts.count(ToastKind::Error), 2);
        assert_eq!(*gate.backend.secret.lock().unwrap(), "123456");
    }

    #[tokio::test]
    async fn successful_change_clears_the_flag() {
        let (mut gate, toasts) = gate(employee(true));
        let mut rx = gate.subscribe();
        gate.login("NV001", "123456").await.unwrap();

        gate.change_password("123456", "newpass1", "newpass1").await.unwrap();

        assert!(matches!(gate.state(), SessionState::Authenticated { must_change: false, .. }));
        assert_eq!(gate.guard("/dashboard"), RouteDecision::Allow);
        assert!(rx.has_changed().unwrap());
        assert!(matches!(*rx.borrow_and_update(), SessionState::Authenticated { must_change: false, .. }));
        assert!(toasts.active().iter().any(|t| t.kind == ToastKind::Success && t.title == "Password changed."));

        gate.logout().await;
        assert_eq!(gate.login("NV001", "123456").await, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn wrong_current_secret_is_rejected() {
        let (mut gate, _) = gate(employee(true));
        gate.login("NV001", "123456").await.unwrap();

        let err = gate.change_password("nope", "newpass1", "newpass1").await.unwrap_err();

        assert_eq!(err, PasswordChangeError::Rejected(AuthError::InvalidCredentials));
        assert!(matches!(gate.state(), SessionState::Authenticated { must_change: true, .. }));
    }

    #[tokio::test]
    async fn change_without_a_session_is_refused() {
        let (mut gate, _) = gate(employee(false));
        let err = gate.change_password("123456", "newpass1", "newpass1").await.unwrap_err();
        assert_eq!(err, PasswordChangeError::NotAuthenticated);
    }

    #[tokio::test]
    async fn guard_follows_the_permission_grid() {
        let (mut gate, _) = gate(employee(false));
        assert_eq!(gate.guard("/dashboard"), RouteDecision::RedirectToLogin);
        assert_eq!(gate.guard(LOGIN_PATH), RouteDecision::Allow);

        gate.login("NV001", "123456").await.unwrap();

        assert_eq!(gate.guard("/equipment"), RouteDecision::Allow);
        assert_eq!(gate.guard("/licenses"), RouteDecision::Forbidden);
        assert_eq!(gate.guard("/settings"), RouteDecision::Forbidden);
        assert!(!crate::services::permission::can(gate.user().as_ref(), ModuleKey::Equipment, Action::Delete));
    }

    #[tokio::test]
    async fn logout_always_ends_anonymous() {
        let (mut gate, _) = gate(employee(false));
        gate.login("NV001", "123456").await.unwrap();
        gate.backend.online = false;

        gate.logout().await;

        assert_eq!(gate.state(), SessionState::Anonymous);
        assert!(gate.user().is_none());
        assert!(gate.token().is_none());
    }
}
