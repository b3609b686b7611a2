// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::auth::User};

/// Rotas que continuam abertas enquanto a troca de senha estiver pendente.
pub const PASSWORD_GATE_EXEMPT: &[&str] = &["/api/auth/change-password", "/api/auth/logout", "/api/users/me"];

// Dados do token atual, guardados nas extensions para o logout
#[derive(Debug, Clone, Copy)]
pub struct TokenId {
    pub jti: Uuid,
    pub expires_at: usize,
}

// O middleware em si
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| AppError::InvalidToken)?;
    let session = app_state.auth_service.validate_token(bearer.token()).await?;

    // Insere o usuário nos "extensions" da requisição
    request.extensions_mut().insert(AuthenticatedUser(session.user));
    request.extensions_mut().insert(TokenId { jti: session.jti, expires_at: session.expires_at });
    Ok(next.run(request).await)
}

/// Depois do `auth_guard`: com a troca de senha pendente, só as rotas isentas passam.
pub async fn password_gate(request: Request, next: Next) -> Result<Response, AppError> {
    let must_change = request
        .extensions()
        .get::<AuthenticatedUser>()
        .is_some_and(|u| u.0.must_change_password);

    // `uri()` aqui já vem sem o prefixo do nest; o caminho completo fica em OriginalUri
    let path = request
        .extensions()
        .get::<axum::extract::OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    if must_change && !PASSWORD_GATE_EXEMPT.contains(&path.trim_end_matches('/')) {
        tracing::info!("⛔ Troca de senha pendente, bloqueando {}", path);
        return Err(AppError::PasswordChangeRequired);
    }

    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}

impl<S> FromRequestParts<S> for TokenId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<TokenId>().copied().ok_or(AppError::InvalidToken)
    }
}
