// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AuthResponse, ChangePasswordPayload, Claims, StaffStatus, User},
};

/// Token já validado: o usuário atual e o `jti` (necessário para o logout).
#[derive(Debug, Clone)]
pub struct TokenSession {
    pub user: User,
    pub jti: Uuid,
    pub expires_at: usize,
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_ttl: chrono::Duration,
    bcrypt_cost: u32,
    // jti -> exp dos tokens revogados no logout
    revoked: Arc<RwLock<HashMap<Uuid, usize>>>,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, token_ttl_hours: i64, bcrypt_cost: u32) -> Self {
        Self {
            user_repo,
            jwt_secret,
            token_ttl: chrono::Duration::hours(token_ttl_hours),
            bcrypt_cost,
            revoked: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, AppError> {
        let password_clone = password.to_owned();
        let password_hash_clone = password_hash.to_owned();

        // Executa a verificação em um thread separado
        let is_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
        Ok(is_valid)
    }

    pub async fn login(&self, identifier: &str, secret: &str) -> Result<AuthResponse, AppError> {
        let record = self
            .user_repo
            .find_by_identifier(identifier)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // Funcionário desligado não entra, mas a resposta é a mesma de senha errada
        if record.status == StaffStatus::Resigned {
            return Err(AppError::InvalidCredentials);
        }

        if !self.verify_password(secret, &record.password_hash).await? {
            tracing::info!("🔒 Falha de login para '{}'", identifier);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(record.id)?;
        tracing::info!("🔑 Login de {} (troca de senha pendente: {})", record.employee_id, record.must_change_password);

        Ok(AuthResponse { token, user: record.into() })
    }

    pub async fn validate_token(&self, token: &str) -> Result<TokenSession, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = token_data.claims;
        if self.revoked.read().await.contains_key(&claims.jti) {
            return Err(AppError::InvalidToken);
        }

        let record = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .filter(|r| r.status == StaffStatus::Active)
            .ok_or(AppError::InvalidToken)?;

        Ok(TokenSession { user: record.into(), jti: claims.jti, expires_at: claims.exp })
    }

    /// Revoga o token. As entradas já expiradas são descartadas aqui mesmo.
    pub async fn logout(&self, jti: Uuid, expires_at: usize) {
        let now = Utc::now().timestamp() as usize;
        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(jti, expires_at);
    }

    /// Ordem das regras: confirmação, tamanho, senha atual.
    /// Devolve o registro relido do repositório, já sem a pendência de troca.
    pub async fn change_password(&self, user_id: Uuid, payload: &ChangePasswordPayload) -> Result<User, AppError> {
        payload.check_rules()?;

        let record = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !self.verify_password(&payload.current_secret, &record.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let new_hash = self.hash_password(&payload.new_secret).await?;
        self.user_repo
            .update_user(user_id, move |r| {
                r.password_hash = new_hash;
                r.must_change_password = false;
            })
            .await?;

        tracing::info!("🔐 Senha alterada para {}", record.employee_id);

        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(User::from)
            .ok_or(AppError::NotFound("staff"))
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: user_id,
            jti: Uuid::new_v4(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
