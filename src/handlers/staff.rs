// src/handlers/staff.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    common::{error::ApiError, query::ListQuery, response::ok},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermPermissionsEdit, PermStaffAdd, PermStaffDelete, PermStaffEdit, PermStaffView, RequirePermission},
    },
    models::auth::{CreateStaffPayload, UpdatePermissionsPayload, UpdateStaffPayload, User},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/staff", get(list_staff).post(create_staff))
        .route("/api/staff/{id}", get(get_staff).put(update_staff).delete(delete_staff))
        .route("/api/staff/{id}/permissions", put(update_permissions))
}

#[utoipa::path(
    get,
    path = "/api/staff",
    tag = "Staff",
    params(ListQuery),
    responses((status = 200, description = "Lista de funcionários", body = Vec<User>)),
    security(("api_jwt" = []))
)]
pub async fn list_staff(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermStaffView>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let staff = app_state
        .staff_service
        .list(&query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(staff))
}

#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário", body = User),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_staff(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermStaffView>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .staff_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(user))
}

#[utoipa::path(
    post,
    path = "/api/staff",
    tag = "Staff",
    request_body = CreateStaffPayload,
    responses(
        (status = 201, description = "Funcionário criado com a senha padrão", body = User),
        (status = 409, description = "Código ou e-mail já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_staff(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    _guard: RequirePermission<PermStaffAdd>,
    Json(payload): Json<CreateStaffPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let created = app_state
        .staff_service
        .create(&actor, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, ok(created)))
}

#[utoipa::path(
    put,
    path = "/api/staff/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    request_body = UpdateStaffPayload,
    responses(
        (status = 200, description = "Funcionário atualizado", body = User),
        (status = 403, description = "Mudar papel ou grade exige permissions:edit")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_staff(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    _guard: RequirePermission<PermStaffEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStaffPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = app_state
        .staff_service
        .update(&actor, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(updated))
}

#[utoipa::path(
    delete,
    path = "/api/staff/{id}",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    responses(
        (status = 200, description = "Funcionário excluído", body = User),
        (status = 400, description = "Tentativa de excluir a própria conta")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_staff(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    _guard: RequirePermission<PermStaffDelete>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = app_state
        .staff_service
        .delete(&actor, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(removed))
}

// Grade de permissões: exige permissions:edit, não staff:edit
#[utoipa::path(
    put,
    path = "/api/staff/{id}/permissions",
    tag = "Staff",
    params(("id" = Uuid, Path, description = "ID do funcionário")),
    request_body = UpdatePermissionsPayload,
    responses((status = 200, description = "Grade substituída", body = User)),
    security(("api_jwt" = []))
)]
pub async fn update_permissions(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(actor): AuthenticatedUser,
    _guard: RequirePermission<PermPermissionsEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePermissionsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = app_state
        .staff_service
        .update_permissions(&actor, id, payload.permissions)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(updated))
}
