// src/services/staff_service.rs

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, query::ListQuery},
    db::UserRepository,
    models::{
        auth::{CreateStaffPayload, StaffRecord, UpdateStaffPayload, User},
        permission::{Action, ModuleKey, PermissionGrid},
    },
    services::{auth::AuthService, collection_service::CollectionService, permission},
};

const STAFF_RESOURCE: &str = "staff";

#[derive(Clone)]
pub struct StaffService {
    user_repo: UserRepository,
    auth_service: AuthService,
    history: CollectionService,
    default_password: String,
}

impl StaffService {
    pub fn new(
        user_repo: UserRepository,
        auth_service: AuthService,
        history: CollectionService,
        default_password: String,
    ) -> Self {
        Self { user_repo, auth_service, history, default_password }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<User>, AppError> {
        let users: Vec<User> = self.user_repo.list().await?.into_iter().map(User::from).collect();
        Ok(query.apply(&users))
    }

    pub async fn get(&self, id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .map(User::from)
            .ok_or(AppError::NotFound(STAFF_RESOURCE))
    }

    /// Novo funcionário: senha padrão e troca obrigatória no primeiro acesso.
    pub async fn create(&self, actor: &User, payload: CreateStaffPayload) -> Result<User, AppError> {
        payload.validate()?;

        let password_hash = self.auth_service.hash_password(&self.default_password).await?;
        let record = StaffRecord {
            id: Uuid::new_v4(),
            employee_id: payload.employee_id.trim().to_string(),
            full_name: payload.full_name,
            email: payload.email.trim().to_string(),
            phone: payload.phone,
            unit: payload.unit,
            position: payload.position,
            join_date: payload.join_date,
            status: payload.status,
            role: payload.role,
            gender: payload.gender,
            permissions: payload.permissions.unwrap_or_else(|| PermissionGrid::for_role(payload.role)),
            must_change_password: true,
            password_hash,
        };

        let created = User::from(self.user_repo.create_user(record).await?);
        tracing::info!("👤 {} cadastrou o funcionário {}", actor.employee_id, created.employee_id);

        self.history.record_usage(actor, "create", created.full_name.clone(), STAFF_RESOURCE).await;
        Ok(created)
    }

    /// Papel e grade só mudam com permissions:edit; reenviar os valores atuais não conta.
    pub async fn update(&self, actor: &User, id: Uuid, payload: UpdateStaffPayload) -> Result<User, AppError> {
        payload.validate()?;

        let current = self.get(id).await?;
        let role_changes = payload.role.is_some_and(|role| role != current.role);
        let grid_changes = payload.permissions.as_ref().is_some_and(|grid| *grid != current.permissions);
        if role_changes || grid_changes {
            permission::ensure(actor, ModuleKey::Permissions, Action::Edit)?;
        }

        let updated = self
            .user_repo
            .update_user(id, move |r| {
                if let Some(v) = payload.employee_id { r.employee_id = v.trim().to_string(); }
                if let Some(v) = payload.full_name { r.full_name = v; }
                if let Some(v) = payload.email { r.email = v.trim().to_string(); }
                if let Some(v) = payload.phone { r.phone = v; }
                if let Some(v) = payload.unit { r.unit = v; }
                if let Some(v) = payload.position { r.position = v; }
                if let Some(v) = payload.join_date { r.join_date = Some(v); }
                if let Some(v) = payload.status { r.status = v; }
                if let Some(v) = payload.role { r.role = v; }
                if let Some(v) = payload.gender { r.gender = v; }
                if let Some(v) = payload.permissions { r.permissions = v; }
            })
            .await?;

        let updated = User::from(updated);
        self.history.record_usage(actor, "update", updated.full_name.clone(), STAFF_RESOURCE).await;
        Ok(updated)
    }

    pub async fn update_permissions(&self, actor: &User, id: Uuid, permissions: PermissionGrid) -> Result<User, AppError> {
        let updated = User::from(self.user_repo.update_user(id, move |r| r.permissions = permissions).await?);
        tracing::info!("🛡️ {} alterou as permissões de {}", actor.employee_id, updated.employee_id);

        self.history.record_usage(actor, "update-permissions", updated.full_name.clone(), STAFF_RESOURCE).await;
        Ok(updated)
    }

    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<User, AppError> {
        if actor.id == id {
            return Err(AppError::CannotDeleteSelf);
        }

        let removed = User::from(self.user_repo.delete_user(id).await?);
        tracing::info!("🗑️ {} excluiu o funcionário {}", actor.employee_id, removed.employee_id);

        self.history.record_usage(actor, "delete", removed.full_name.clone(), STAFF_RESOURCE).await;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{kv_store::MemoryStore, CollectionRepository},
        models::{
            auth::{Gender, StaffStatus},
            permission::{Action, ModuleKey, ModulePermissions, Role},
        },
        services::permission::tests::user_with,
    };
    use std::sync::Arc;

    fn setup() -> (StaffService, AuthService) {
        let collections = CollectionRepository::new(Arc::new(MemoryStore::new()));
        let user_repo = UserRepository::new(collections.clone());
        let auth = AuthService::new(user_repo.clone(), "test-secret".into(), 1, 4);
        let staff = StaffService::new(user_repo, auth.clone(), CollectionService::new(collections), "123456".into());
        (staff, auth)
    }

    fn new_staff(employee_id: &str, email: &str, role: Role) -> CreateStaffPayload {
        CreateStaffPayload {
            employee_id: employee_id.into(),
            full_name: format!("Staff {employee_id}"),
            email: email.into(),
            phone: String::new(),
            unit: "IT".into(),
            position: String::new(),
            join_date: None,
            status: StaffStatus::Active,
            role,
            gender: Gender::Female,
            permissions: None,
        }
    }

    #[tokio::test]
    async fn new_staff_get_the_default_password_and_must_change_it() {
        let (staff, auth) = setup();
        let admin = user_with(Role::Admin, PermissionGrid::full());

        let created = staff.create(&admin, new_staff("NV010", "nv010@company.com", Role::UnitManager)).await.unwrap();

        assert!(created.must_change_password);
        assert_eq!(created.permissions, PermissionGrid::for_role(Role::UnitManager));
        let login = auth.login("NV010", "123456").await.unwrap();
        assert!(login.user.must_change_password);
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let (staff, _) = setup();
        let admin = user_with(Role::Admin, PermissionGrid::full());

        let result = staff.create(&admin, new_staff("NV010", "not-an-email", Role::Employee)).await;
        assert!(matches!(result, Err(AppError::ValidationFailed(_))));
    }

    #[tokio::test]
    async fn permission_edits_replace_the_grid() {
        let (staff, _) = setup();
        let admin = user_with(Role::Admin, PermissionGrid::full());
        let created = staff.create(&admin, new_staff("NV010", "nv010@company.com", Role::Employee)).await.unwrap();

        let grid = PermissionGrid::deny_all().with(ModuleKey::Licenses, ModulePermissions::FULL);
        let updated = staff.update_permissions(&admin, created.id, grid.clone()).await.unwrap();

        assert_eq!(updated.permissions, grid);
        assert!(!updated.permissions.allows(ModuleKey::Dashboard, Action::View));
        assert!(updated.must_change_password);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let (staff, _) = setup();
        let admin = user_with(Role::Admin, PermissionGrid::full());
        let created = staff.create(&admin, new_staff("NV010", "nv010@company.com", Role::Employee)).await.unwrap();

        let updated = staff
            .update(&admin, created.id, UpdateStaffPayload { position: Some("Tester".into()), ..Default::default() })
            .await
            .unwrap();

        assert_eq!(updated.position, "Tester");
        assert_eq!(updated.email, "nv010@company.com");
    }

    #[tokio::test]
    async fn role_and_grid_changes_need_the_permissions_module() {
        let (staff, _) = setup();
        let admin = user_with(Role::Admin, PermissionGrid::full());
        let created = staff.create(&admin, new_staff("NV010", "nv010@company.com", Role::UnitManager)).await.unwrap();
        let grid = PermissionGrid::deny_all().with(
            ModuleKey::Staff,
            ModulePermissions { view: true, edit: true, ..Default::default() },
        );
        let manager = staff.update_permissions(&admin, created.id, grid).await.unwrap();

        let promote = UpdateStaffPayload { role: Some(Role::Admin), ..Default::default() };
        assert!(matches!(
            staff.update(&manager, manager.id, promote).await,
            Err(AppError::Forbidden { module: ModuleKey::Permissions, action: Action::Edit })
        ));

        let widen = UpdateStaffPayload { permissions: Some(PermissionGrid::full()), ..Default::default() };
        assert!(staff.update(&manager, manager.id, widen).await.is_err());

        // Reenviar o papel e a grade atuais junto com outro campo é permitido
        let same = UpdateStaffPayload {
            position: Some("Lead".into()),
            role: Some(manager.role),
            permissions: Some(manager.permissions.clone()),
            ..Default::default()
        };
        let updated = staff.update(&manager, manager.id, same).await.unwrap();
        assert_eq!(updated.position, "Lead");
        assert_eq!(updated.role, Role::UnitManager);
    }

    #[tokio::test]
    async fn nobody_deletes_themselves() {
        let (staff, _) = setup();
        let admin = user_with(Role::Admin, PermissionGrid::full());
        let created = staff.create(&admin, new_staff("NV010", "nv010@company.com", Role::Admin)).await.unwrap();

        let result = staff.delete(&created, created.id).await;
        assert!(matches!(result, Err(AppError::CannotDeleteSelf)));

        staff.delete(&admin, created.id).await.unwrap();
        assert!(matches!(staff.get(created.id).await, Err(AppError::NotFound(_))));
    }
}
