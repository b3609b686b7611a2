// src/models/auth.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::permission::{PermissionGrid, Role},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    #[default]
    Active,
    Resigned,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

// Representa um funcionário como está gravado na tabela 'staff'.
// Ele carrega o hash da senha, então NUNCA sai para o cliente.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRecord {
    pub id: Uuid,
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: StaffStatus,
    pub role: Role,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub permissions: PermissionGrid,
    #[serde(default)]
    pub must_change_password: bool,
    pub password_hash: String,
}

// A visão pública do funcionário (o "usuário" da sessão)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: StaffStatus,
    pub role: Role,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub permissions: PermissionGrid,
    #[serde(default)]
    pub must_change_password: bool,
}

impl From<&StaffRecord> for User {
    fn from(record: &StaffRecord) -> Self {
        Self {
            id: record.id,
            employee_id: record.employee_id.clone(),
            full_name: record.full_name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            unit: record.unit.clone(),
            position: record.position.clone(),
            join_date: record.join_date,
            status: record.status,
            role: record.role,
            gender: record.gender,
            permissions: record.permissions.clone(),
            must_change_password: record.must_change_password,
        }
    }
}

impl From<StaffRecord> for User {
    fn from(record: StaffRecord) -> Self {
        User::from(&record)
    }
}

// Dados para login. Aceita também os nomes antigos (employeeId / password).
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[serde(alias = "employeeId")]
    #[validate(length(min = 1, message = "O identificador é obrigatório."))]
    pub identifier: String,
    #[serde(alias = "password")]
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub secret: String,
}

// Troca de senha. Sem `Validate`: cada regra tem o seu próprio erro (check_rules).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    pub current_secret: String,
    pub new_secret: String,
    pub confirm_secret: String,
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// Confirmação antes do tamanho: "abc"/"abd" é Mismatch, não TooShort.
pub fn check_new_password(new_secret: &str, confirm_secret: &str) -> Result<(), AppError> {
    if new_secret != confirm_secret {
        return Err(AppError::PasswordMismatch);
    }
    if new_secret.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::PasswordTooShort);
    }
    Ok(())
}

impl ChangePasswordPayload {
    pub fn check_rules(&self) -> Result<(), AppError> {
        check_new_password(&self.new_secret, &self.confirm_secret)
    }
}

// Resposta de autenticação com o token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do funcionário)
    pub jti: Uuid,  // ID do token, usado para revogar no logout
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}

// ---
// Payloads de gestão de funcionários
// ---
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffPayload {
    #[validate(length(min = 1, message = "O código do funcionário é obrigatório."))]
    pub employee_id: String,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub full_name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: StaffStatus,
    pub role: Role,
    #[serde(default)]
    pub gender: Gender,

    // Sem grade explícita, o papel decide (PermissionGrid::for_role)
    #[serde(default)]
    pub permissions: Option<PermissionGrid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStaffPayload {
    #[validate(length(min = 1, message = "O código do funcionário é obrigatório."))]
    pub employee_id: Option<String>,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub full_name: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub unit: Option<String>,
    pub position: Option<String>,
    pub join_date: Option<NaiveDate>,
    pub status: Option<StaffStatus>,
    pub role: Option<Role>,
    pub gender: Option<Gender>,
    pub permissions: Option<PermissionGrid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePermissionsPayload {
    pub permissions: PermissionGrid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mismatch_wins_over_length() {
        assert!(matches!(check_new_password("abc", "abd"), Err(AppError::PasswordMismatch)));
        assert!(matches!(check_new_password("abc", "abc"), Err(AppError::PasswordTooShort)));
        assert!(check_new_password("newpass1", "newpass1").is_ok());
    }

    #[test]
    fn login_accepts_legacy_field_names() {
        let payload: LoginPayload = serde_json::from_value(json!({
            "employeeId": "NV001",
            "password": "123456"
        }))
        .unwrap();
        assert_eq!(payload.identifier, "NV001");
        assert_eq!(payload.secret, "123456");
    }

    #[test]
    fn public_user_never_carries_the_hash() {
        let record: StaffRecord = serde_json::from_value(json!({
            "id": "7f1c8a52-6a53-4b7a-9d2e-2c1b0b4e9a11",
            "employeeId": "NV001",
            "fullName": "Nguyen Van An",
            "email": "an@company.com",
            "role": "employee",
            "passwordHash": "$2b$04$abc"
        }))
        .unwrap();

        let value = serde_json::to_value(User::from(&record)).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["mustChangePassword"], json!(false));
    }
}
