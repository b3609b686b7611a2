// src/db/user_repo.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CollectionRepository,
    models::auth::StaffRecord,
};

pub const STAFF_TABLE: &str = "staff";

// O repositório de funcionários, responsável por todas as interações com a tabela 'staff'
#[derive(Clone)]
pub struct UserRepository {
    collections: CollectionRepository,
}

// Código único e e-mail único (ignorando maiúsculas), sem contar o próprio registro
fn check_unique(rows: &[StaffRecord], candidate: &StaffRecord) -> Result<(), AppError> {
    for other in rows.iter().filter(|r| r.id != candidate.id) {
        if other.employee_id == candidate.employee_id {
            return Err(AppError::EmployeeIdAlreadyExists);
        }
        if other.email.eq_ignore_ascii_case(&candidate.email) {
            return Err(AppError::EmailAlreadyExists);
        }
    }
    Ok(())
}

impl UserRepository {
    pub fn new(collections: CollectionRepository) -> Self {
        Self { collections }
    }

    pub async fn list(&self) -> Result<Vec<StaffRecord>, AppError> {
        self.collections.load(STAFF_TABLE).await
    }

    // Busca pelo código do funcionário ou pelo e-mail
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<StaffRecord>, AppError> {
        let identifier = identifier.trim();
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|r| r.employee_id == identifier || r.email.eq_ignore_ascii_case(identifier)))
    }

    // Busca um funcionário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<StaffRecord>, AppError> {
        Ok(self.list().await?.into_iter().find(|r| r.id == id))
    }

    // Cria um novo funcionário, com tratamento de erro específico para duplicados.
    pub async fn create_user(&self, mut record: StaffRecord) -> Result<StaffRecord, AppError> {
        if record.id.is_nil() {
            record.id = Uuid::new_v4();
        }
        self.collections
            .modify::<StaffRecord, _, _>(STAFF_TABLE, |rows| {
                check_unique(rows, &record)?;
                rows.push(record.clone());
                Ok(record)
            })
            .await
    }

    /// Aplica `change` ao registro e grava. Duplicados desfazem a operação inteira.
    pub async fn update_user<F>(&self, id: Uuid, change: F) -> Result<StaffRecord, AppError>
    where
        F: FnOnce(&mut StaffRecord) + Send,
    {
        self.collections
            .modify::<StaffRecord, _, _>(STAFF_TABLE, |rows| {
                let index = rows
                    .iter()
                    .position(|r| r.id == id)
                    .ok_or(AppError::NotFound(STAFF_TABLE))?;

                let mut updated = rows[index].clone();
                change(&mut updated);
                updated.id = id;
                check_unique(rows, &updated)?;

                rows[index] = updated.clone();
                Ok(updated)
            })
            .await
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<StaffRecord, AppError> {
        self.collections
            .modify::<StaffRecord, _, _>(STAFF_TABLE, |rows| {
                let index = rows
                    .iter()
                    .position(|r| r.id == id)
                    .ok_or(AppError::NotFound(STAFF_TABLE))?;
                Ok(rows.remove(index))
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::kv_store::MemoryStore,
        models::{
            auth::{Gender, StaffStatus},
            permission::{PermissionGrid, Role},
        },
    };
    use std::sync::Arc;

    fn record(employee_id: &str, email: &str) -> StaffRecord {
        StaffRecord {
            id: Uuid::nil(),
            employee_id: employee_id.into(),
            full_name: format!("Staff {employee_id}"),
            email: email.into(),
            phone: String::new(),
            unit: String::new(),
            position: String::new(),
            join_date: None,
            status: StaffStatus::Active,
            role: Role::Employee,
            gender: Gender::Other,
            permissions: PermissionGrid::for_role(Role::Employee),
            must_change_password: true,
            password_hash: "hash".into(),
        }
    }

    fn repo() -> UserRepository {
        UserRepository::new(CollectionRepository::new(Arc::new(MemoryStore::new())))
    }

    #[tokio::test]
    async fn finds_by_employee_id_or_email() {
        let repo = repo();
        let created = repo.create_user(record("NV001", "an@company.com")).await.unwrap();

        let by_code = repo.find_by_identifier("NV001").await.unwrap().unwrap();
        let by_mail = repo.find_by_identifier("AN@company.com").await.unwrap().unwrap();

        assert_eq!(by_code.id, created.id);
        assert_eq!(by_mail.id, created.id);
        assert!(repo.find_by_identifier("nv001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicates_are_rejected() {
        let repo = repo();
        repo.create_user(record("NV001", "an@company.com")).await.unwrap();

        let same_code = repo.create_user(record("NV001", "other@company.com")).await;
        let same_mail = repo.create_user(record("NV002", "An@Company.com")).await;

        assert!(matches!(same_code, Err(AppError::EmployeeIdAlreadyExists)));
        assert!(matches!(same_mail, Err(AppError::EmailAlreadyExists)));
    }

    #[tokio::test]
    async fn update_rejects_taking_someone_elses_email() {
        let repo = repo();
        repo.create_user(record("NV001", "an@company.com")).await.unwrap();
        let binh = repo.create_user(record("NV002", "binh@company.com")).await.unwrap();

        let result = repo
            .update_user(binh.id, |r| r.email = "an@company.com".into())
            .await;

        assert!(matches!(result, Err(AppError::EmailAlreadyExists)));
        let stored = repo.find_by_id(binh.id).await.unwrap().unwrap();
        assert_eq!(stored.email, "binh@company.com");
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids_are_not_found() {
        let repo = repo();
        let missing = Uuid::new_v4();

        assert!(matches!(repo.update_user(missing, |_| {}).await, Err(AppError::NotFound(_))));
        assert!(matches!(repo.delete_user(missing).await, Err(AppError::NotFound(_))));
    }
}
