// src/handlers/records.rs
//
// CRUD genérico das coleções planas. Cada entidade ganha
// GET/POST /api/{resource} e GET/PUT/DELETE /api/{resource}/{id}.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    common::{error::ApiError, query::ListQuery, response::ok},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{AddOf, DeleteOf, EditOf, PermUsageHistoryView, RequirePermission, ViewOf},
    },
    models::assets::{Entity, UsageHistory},
};

pub fn routes<E: Entity>() -> Router<AppState> {
    Router::new()
        .route(&format!("/api/{}", E::RESOURCE), get(list::<E>).post(create::<E>))
        .route(
            &format!("/api/{}/{{id}}", E::RESOURCE),
            get(get_one::<E>).put(update::<E>).delete(delete::<E>),
        )
}

pub async fn list<E: Entity>(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<ViewOf<E>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state
        .collection_service
        .list::<E>(&query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(items))
}

pub async fn get_one<E: Entity>(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<ViewOf<E>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state
        .collection_service
        .get::<E>(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(item))
}

pub async fn create<E: Entity>(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<AddOf<E>>,
    Json(entity): Json<E>,
) -> Result<impl IntoResponse, ApiError> {
    let created = app_state
        .collection_service
        .create(&user, entity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, ok(created)))
}

pub async fn update<E: Entity>(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<EditOf<E>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<Map<String, Value>>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = app_state
        .collection_service
        .update::<E>(&user, id, patch)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(updated))
}

pub async fn delete<E: Entity>(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<DeleteOf<E>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = app_state
        .collection_service
        .delete::<E>(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(removed))
}

// Histórico de uso: só leitura
#[utoipa::path(
    get,
    path = "/api/usage-history",
    tag = "Usage History",
    params(ListQuery),
    responses((status = 200, description = "Histórico de uso, mais recentes primeiro", body = Vec<UsageHistory>)),
    security(("api_jwt" = []))
)]
pub async fn usage_history(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermUsageHistoryView>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = app_state
        .collection_service
        .usage_history(&query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(entries))
}
