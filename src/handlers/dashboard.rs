// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse};

use crate::{
    common::{error::ApiError, response::ok},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermDashboardView, RequirePermission},
    },
    models::dashboard::DashboardSummary,
};

#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores do painel", body = DashboardSummary),
        (status = 403, description = "Sem permissão dashboard:view")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermDashboardView>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .dashboard_service
        .get_summary()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(ok(summary))
}
