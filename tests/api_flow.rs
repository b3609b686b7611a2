// tests/api_flow.rs
//
// Sobe o servidor numa porta livre e conversa com ele pelo cliente REST.

use std::sync::Arc;

use serde_json::Value;
use tokio::net::TcpListener;
use uuid::Uuid;

use it_asset_admin::{
    build_router,
    client::{
        notifier::{ToastCenter, ToastKind},
        AuthBackend, AuthError, CollectionSource, CollectionStore, PasswordChangeError, RestBackend,
        RouteDecision, SessionGate, SessionState,
    },
    common::error::AppError,
    config::{AppState, Config, ADMIN_SEED_PASSWORD},
    db::kv_store::MemoryStore,
    models::{
        assets::{Equipment, License},
        auth::User,
        permission::{Action, ModuleKey, ModulePermissions, PermissionGrid, Role},
    },
};

async fn spawn_server() -> RestBackend {
    let config = Config { bcrypt_cost: 4, ..Config::in_memory("api-flow-secret") };
    let app_state = AppState::with_store(config, Arc::new(MemoryStore::new()))
        .await
        .expect("estado da aplicação");

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("porta livre");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(app_state)).await.unwrap();
    });

    RestBackend::new(format!("http://{addr}"))
}

fn gate(backend: &RestBackend) -> (SessionGate<RestBackend>, Arc<ToastCenter>) {
    let toasts = Arc::new(ToastCenter::new());
    (SessionGate::new(backend.clone(), toasts.clone()), toasts)
}

async fn admin_gate(backend: &RestBackend) -> SessionGate<RestBackend> {
    let (mut gate, _) = gate(backend);
    gate.login("admin", ADMIN_SEED_PASSWORD).await.unwrap();
    gate
}

#[tokio::test]
async fn health_and_docs_are_public() {
    let backend = spawn_server().await;
    let http = reqwest::Client::new();

    let health: Value = http.get(backend.url("/api/health")).send().await.unwrap().json().await.unwrap();
    assert_eq!(health["ok"], true);

    let doc: Value = http.get(backend.url("/api-docs/openapi.json")).send().await.unwrap().json().await.unwrap();
    assert!(doc["paths"]["/api/auth/login"].is_object());
}

#[tokio::test]
async fn wrong_secret_is_refused() {
    let backend = spawn_server().await;
    let (mut gate, toasts) = gate(&backend);

    let err = gate.login("admin", "wrong-secret").await.unwrap_err();

    assert_eq!(err, AuthError::InvalidCredentials);
    assert_eq!(gate.state(), SessionState::Anonymous);
    assert_eq!(toasts.count(ToastKind::Error), 1);
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let backend = spawn_server().await;
    let response = reqwest::Client::new().get(backend.url("/api/equipment")).send().await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn pending_password_change_locks_client_and_server() {
    let backend = spawn_server().await;
    let (mut gate, _) = gate(&backend);

    let user = gate.login("NV001", "123456").await.unwrap();
    assert!(user.must_change_password);
    assert_eq!(gate.guard("/dashboard"), RouteDecision::RedirectToPasswordChange);

    let token = gate.token().unwrap().to_string();
    let response = reqwest::Client::new()
        .get(backend.url("/api/dashboard/summary"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "PASSWORD_CHANGE_REQUIRED");

    // /api/users/me continua aberto para a tela de troca
    assert_eq!(backend.current_user(&token).await.unwrap().employee_id, "NV001");
}

#[tokio::test]
async fn password_rules_and_successful_change() {
    let backend = spawn_server().await;
    let (mut gate, _) = gate(&backend);
    gate.login("NV001", "123456").await.unwrap();
    let before = gate.state();

    assert_eq!(gate.change_password("123456", "abc", "abc").await, Err(PasswordChangeError::TooShort));
    assert_eq!(
        gate.change_password("123456", "newpass1", "newpass2").await,
        Err(PasswordChangeError::Mismatch)
    );
    assert_eq!(gate.state(), before);

    assert_eq!(
        gate.change_password("nope-nope", "newpass1", "newpass1").await,
        Err(PasswordChangeError::Rejected(AuthError::InvalidCredentials))
    );

    gate.change_password("123456", "newpass1", "newpass1").await.unwrap();
    assert!(matches!(gate.state(), SessionState::Authenticated { must_change: false, .. }));
    assert_eq!(gate.guard("/dashboard"), RouteDecision::Allow);

    gate.logout().await;
    assert_eq!(gate.login("NV001", "123456").await, Err(AuthError::InvalidCredentials));
    assert!(!gate.login("NV001", "newpass1").await.unwrap().must_change_password);
}

#[tokio::test]
async fn deleting_an_absent_equipment_id_is_not_found() {
    let backend = spawn_server().await;
    let gate = admin_gate(&backend).await;
    let toasts = Arc::new(ToastCenter::new());
    let mut store = CollectionStore::new(backend.collection::<Equipment>(gate.token().unwrap()), toasts.clone());
    store.refresh().await.unwrap();
    let before = store.items().to_vec();

    let err = store.delete(Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(store.items(), before.as_slice());
    assert_eq!(toasts.count(ToastKind::Error), 1);
}

#[tokio::test]
async fn refresh_twice_gives_equal_items() {
    let backend = spawn_server().await;
    let gate = admin_gate(&backend).await;
    let mut store = CollectionStore::new(
        backend.collection::<License>(gate.token().unwrap()),
        Arc::new(ToastCenter::new()),
    );

    store.refresh().await.unwrap();
    let first = store.items().to_vec();
    store.refresh().await.unwrap();

    assert_eq!(first, store.items());
    assert!(!first.is_empty());
}

#[tokio::test]
async fn mutations_show_up_in_the_usage_history() {
    let backend = spawn_server().await;
    let gate = admin_gate(&backend).await;
    let token = gate.token().unwrap().to_string();
    let mut store = CollectionStore::new(backend.collection::<Equipment>(token.clone()), Arc::new(ToastCenter::new()));
    store.refresh().await.unwrap();

    let created = store
        .create(Equipment {
            asset_tag: "MN001".into(),
            device_name: "Dell P2422H".into(),
            device_type: "Monitor".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    let renamed = store
        .update(created.id, Equipment { device_name: "Dell P2423".into(), ..created.clone() })
        .await
        .unwrap();
    assert_eq!(renamed.device_name, "Dell P2423");
    assert_eq!(renamed.asset_tag, "MN001");

    let history: Value = reqwest::Client::new()
        .get(backend.url("/api/usage-history"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let actions: Vec<&str> = history["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|h| h["action"].as_str())
        .collect();
    assert!(actions.contains(&"create"));
    assert!(actions.contains(&"update"));
}

#[tokio::test]
async fn employees_cannot_delete_equipment() {
    let backend = spawn_server().await;
    let (mut gate, _) = gate(&backend);
    gate.login("NV002", "123456").await.unwrap();
    gate.change_password("123456", "secret99", "secret99").await.unwrap();

    let source = backend.collection::<Equipment>(gate.token().unwrap());
    let items = source.fetch_all().await.unwrap();
    let err = source.delete(items[0].id).await.unwrap_err();

    assert!(matches!(err, AppError::Forbidden { module: ModuleKey::Equipment, action: Action::Delete }));
    assert_eq!(gate.guard("/settings"), RouteDecision::Forbidden);
}

#[tokio::test]
async fn admin_manages_staff_and_cannot_delete_itself() {
    let backend = spawn_server().await;
    let gate = admin_gate(&backend).await;
    let admin = gate.user().unwrap();
    let staff = backend.collection::<User>(gate.token().unwrap());

    let mut template = admin.clone();
    template.employee_id = "NV010".into();
    template.email = "nv010@company.com".into();
    template.role = Role::Employee;
    let created = staff.create(&template).await.unwrap();
    assert!(created.must_change_password);

    assert!(matches!(staff.delete(admin.id).await, Err(AppError::CannotDeleteSelf)));
    staff.delete(created.id).await.unwrap();
    assert_eq!(staff.fetch_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn revoked_token_is_refused() {
    let backend = spawn_server().await;
    let mut gate = admin_gate(&backend).await;
    let token = gate.token().unwrap().to_string();

    gate.logout().await;

    assert!(matches!(backend.current_user(&token).await, Err(AppError::InvalidToken)));
}

#[tokio::test]
async fn staff_editors_cannot_change_roles_or_grids() {
    let backend = spawn_server().await;
    let admin = admin_gate(&backend).await;

    let mut template = admin.user().unwrap();
    template.employee_id = "MGR1".into();
    template.email = "mgr1@company.com".into();
    template.role = Role::UnitManager;
    template.permissions = PermissionGrid::deny_all().with(
        ModuleKey::Staff,
        ModulePermissions { view: true, edit: true, ..Default::default() },
    );
    backend.collection::<User>(admin.token().unwrap()).create(&template).await.unwrap();

    let (mut gate, _) = gate(&backend);
    gate.login("MGR1", "123456").await.unwrap();
    gate.change_password("123456", "manager1", "manager1").await.unwrap();
    let me = gate.user().unwrap();
    let token = gate.token().unwrap().to_string();
    let http = reqwest::Client::new();

    let grid = http
        .put(backend.url(&format!("/api/staff/{}/permissions", me.id)))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "permissions": PermissionGrid::full() }))
        .send()
        .await
        .unwrap();
    assert_eq!(grid.status(), reqwest::StatusCode::FORBIDDEN);

    let promote = http
        .put(backend.url(&format!("/api/staff/{}", me.id)))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "role": "admin", "permissions": PermissionGrid::full() }))
        .send()
        .await
        .unwrap();
    assert_eq!(promote.status(), reqwest::StatusCode::FORBIDDEN);
    let body: Value = promote.json().await.unwrap();
    assert_eq!(body["code"], "FORBIDDEN");
    assert_eq!(body["details"]["module"], "permissions");

    // O formulário inteiro com papel e grade inalterados continua passando
    let staff = backend.collection::<User>(token.clone());
    let err = staff.update(me.id, &User { role: Role::Admin, ..me.clone() }).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden { module: ModuleKey::Permissions, action: Action::Edit }));
    let moved = staff.update(me.id, &User { position: "Team lead".into(), ..me.clone() }).await.unwrap();
    assert_eq!(moved.position, "Team lead");

    let after = backend.current_user(&token).await.unwrap();
    assert_eq!(after.role, Role::UnitManager);
    assert_eq!(after.permissions, me.permissions);
}
