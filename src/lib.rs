// src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};

pub mod client;
pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{
    common::response::ok,
    config::AppState,
    handlers::records,
    middleware::auth::{auth_guard, password_gate},
    models::assets::{
        Allocation, Equipment, EquipmentType, License, Maintenance, Manufacturer, Ticket, Transfer, Unit,
    },
};

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas
    let public_routes = Router::new()
        .route("/api/health", get(|| async { ok("OK") }))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api-docs/openapi.json", get(docs::openapi_json));

    // Rotas protegidas: auth_guard roda primeiro, depois o password_gate
    let protected_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/change-password", post(handlers::auth::change_password))
        .route("/api/users/me", get(handlers::auth::get_me))
        .route("/api/users/me/navigation", get(handlers::auth::my_navigation))
        .route("/api/dashboard/summary", get(handlers::dashboard::get_summary))
        .route("/api/usage-history", get(records::usage_history))
        .merge(handlers::staff::routes())
        .merge(records::routes::<Equipment>())
        .merge(records::routes::<EquipmentType>())
        .merge(records::routes::<Manufacturer>())
        .merge(records::routes::<Unit>())
        .merge(records::routes::<License>())
        .merge(records::routes::<Allocation>())
        .merge(records::routes::<Maintenance>())
        .merge(records::routes::<Transfer>())
        .merge(records::routes::<Ticket>())
        .layer(axum_middleware::from_fn(password_gate))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}
