// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    models::permission::{Action, ModuleKey},
};

// Nosso tipo de erro interno, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationFailed(#[from] validator::ValidationErrors),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Serviço indisponível: {0}")]
    ServiceUnavailable(String),

    #[error("A confirmação da senha não confere")]
    PasswordMismatch,

    #[error("A nova senha é curta demais")]
    PasswordTooShort,

    #[error("Troca de senha obrigatória")]
    PasswordChangeRequired,

    #[error("Sem permissão '{module}:{action}'")]
    Forbidden { module: ModuleKey, action: Action },

    #[error("Registro não encontrado em '{0}'")]
    NotFound(&'static str),

    #[error("Código de funcionário já existe")]
    EmployeeIdAlreadyExists,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Não é possível excluir a própria conta")]
    CannotDeleteSelf,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Código estável enviado ao cliente (e chave do catálogo de mensagens).
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationFailed(_) => "VALIDATION_FAILED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::PasswordMismatch => "PASSWORD_MISMATCH",
            AppError::PasswordTooShort => "PASSWORD_TOO_SHORT",
            AppError::PasswordChangeRequired => "PASSWORD_CHANGE_REQUIRED",
            AppError::Forbidden { .. } => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::EmployeeIdAlreadyExists => "EMPLOYEE_ID_ALREADY_EXISTS",
            AppError::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            AppError::CannotDeleteSelf => "CANNOT_DELETE_SELF",
            AppError::DatabaseError(_)
            | AppError::SerializationError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationFailed(_)
            | AppError::PasswordMismatch
            | AppError::PasswordTooShort
            | AppError::CannotDeleteSelf => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::PasswordChangeRequired | AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmployeeIdAlreadyExists | AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Reconstrói o erro a partir do `code` de uma resposta da API (usado pelo cliente REST).
    pub fn from_code(code: &str, message: String, details: Option<&Value>) -> Self {
        match code {
            "VALIDATION_FAILED" => AppError::ValidationFailed(validator::ValidationErrors::new()),
            "FORBIDDEN" => {
                let forbidden = details.and_then(|d| {
                    let module = serde_json::from_value(d.get("module")?.clone()).ok()?;
                    let action = serde_json::from_value(d.get("action")?.clone()).ok()?;
                    Some(AppError::Forbidden { module, action })
                });
                forbidden.unwrap_or_else(|| AppError::InternalServerError(anyhow::anyhow!("{code}: {message}")))
            }
            "INVALID_CREDENTIALS" => AppError::InvalidCredentials,
            "INVALID_TOKEN" => AppError::InvalidToken,
            "PASSWORD_MISMATCH" => AppError::PasswordMismatch,
            "PASSWORD_TOO_SHORT" => AppError::PasswordTooShort,
            "PASSWORD_CHANGE_REQUIRED" => AppError::PasswordChangeRequired,
            "NOT_FOUND" => AppError::NotFound("remote"),
            "EMPLOYEE_ID_ALREADY_EXISTS" => AppError::EmployeeIdAlreadyExists,
            "EMAIL_ALREADY_EXISTS" => AppError::EmailAlreadyExists,
            "CANNOT_DELETE_SELF" => AppError::CannotDeleteSelf,
            "SERVICE_UNAVAILABLE" => AppError::ServiceUnavailable(message),
            _ => AppError::InternalServerError(anyhow::anyhow!("{code}: {message}")),
        }
    }

    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status();
        let code = self.code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            tracing::error!("Erro Interno do Servidor: {:?}", self);
        }

        let mut message = i18n.translate(&locale.0, code);
        if let AppError::Forbidden { module, action } = self {
            message = format!("{message} ({module}:{action})");
        }

        // Retorna todos os detalhes da validação, campo a campo.
        let details = match self {
            AppError::ValidationFailed(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                Some(Value::Object(details))
            }
            AppError::Forbidden { module, action } => Some(json!({ "module": module, "action": action })),
            _ => None,
        };

        ApiError { status, code: code.to_string(), error: message, details }
    }
}

// O erro que de fato sai na resposta HTTP, já traduzido
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "ok": false,
            "code": self.code,
            "error": self.error,
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

// Para os middlewares, que não têm o idioma à mão: responde no idioma padrão.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &I18nStore::default()).into_response()
    }
}
