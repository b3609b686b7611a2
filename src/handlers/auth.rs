// src/handlers/auth.rs

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        response::ok,
    },
    config::AppState,
    middleware::{
        auth::{AuthenticatedUser, TokenId},
        i18n::Locale,
    },
    models::auth::{AuthResponse, ChangePasswordPayload, LoginPayload, User},
    services::navigation::visible_navigation,
};

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login bem-sucedido", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationFailed(e).to_api_error(&locale, &app_state.i18n_store))?;

    let auth = app_state
        .auth_service
        .login(&payload.identifier, &payload.secret)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(auth))
}

// O token apresentado deixa de valer
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Token revogado")),
    security(("api_jwt" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    token: TokenId,
) -> impl IntoResponse {
    app_state.auth_service.logout(token.jti, token.expires_at).await;
    tracing::info!("👋 Logout de {}", user.employee_id);
    ok(json!({ "loggedOut": true }))
}

#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    tag = "Auth",
    request_body = ChangePasswordPayload,
    responses(
        (status = 200, description = "Senha alterada; devolve o usuário atualizado", body = User),
        (status = 400, description = "Confirmação diferente ou senha curta demais"),
        (status = 401, description = "Senha atual incorreta")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = app_state
        .auth_service
        .change_password(user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(updated))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses((status = 200, description = "Usuário autenticado", body = User)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> impl IntoResponse {
    ok(user)
}

// Menu lateral já filtrado pelo papel e pela grade do usuário
#[utoipa::path(
    get,
    path = "/api/users/me/navigation",
    tag = "Users",
    responses((status = 200, description = "Itens de menu visíveis para o usuário")),
    security(("api_jwt" = []))
)]
pub async fn my_navigation(AuthenticatedUser(user): AuthenticatedUser) -> impl IntoResponse {
    ok(visible_navigation(Some(&user)))
}
