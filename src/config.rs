// src/config.rs

use anyhow::Context;
use std::{env, sync::Arc};

use crate::{
    common::i18n::I18nStore,
    db::{
        kv_store::{KeyValueStore, MemoryStore, SqliteStore},
        seed::{seed_demo_data, SeedPasswords},
        CollectionRepository, UserRepository,
    },
    services::{AuthService, CollectionService, DashboardService, StaffService},
};

pub const ADMIN_SEED_PASSWORD: &str = "Admin@345";

// Configuração lida do ambiente (.env incluso)
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    /// Sem URL, tudo fica em memória.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub default_staff_password: String,
    pub seed_demo_data: bool,
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().with_context(|| format!("{name} inválida: '{raw}'")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            token_ttl_hours: parse_var("TOKEN_TTL_HOURS", 24)?,
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            default_staff_password: env::var("DEFAULT_STAFF_PASSWORD").unwrap_or_else(|_| "123456".to_string()),
            seed_demo_data: parse_var("SEED_DEMO_DATA", true)?,
        })
    }

    /// Tudo em memória e com os dados de demonstração (modo sem servidor, testes).
    pub fn in_memory(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            database_url: None,
            jwt_secret: jwt_secret.into(),
            token_ttl_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            default_staff_password: "123456".to_string(),
            seed_demo_data: true,
        }
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn KeyValueStore>,
    pub i18n_store: Arc<I18nStore>,
    pub user_repo: UserRepository,
    pub auth_service: AuthService,
    pub collection_service: CollectionService,
    pub staff_service: StaffService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn KeyValueStore> = match &config.database_url {
            Some(url) => {
                let store = SqliteStore::connect(url)
                    .await
                    .with_context(|| format!("Falha ao conectar ao banco de dados '{url}'"))?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
                Arc::new(store)
            }
            None => {
                tracing::info!("💾 DATABASE_URL ausente: usando armazenamento em memória");
                Arc::new(MemoryStore::new())
            }
        };

        Self::with_store(config, store).await
    }

    // --- Monta o gráfico de dependências ---
    pub async fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> anyhow::Result<Self> {
        let collections = CollectionRepository::new(store.clone());
        let user_repo = UserRepository::new(collections.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            config.jwt_secret.clone(),
            config.token_ttl_hours,
            config.bcrypt_cost,
        );
        let collection_service = CollectionService::new(collections.clone());
        let staff_service = StaffService::new(
            user_repo.clone(),
            auth_service.clone(),
            collection_service.clone(),
            config.default_staff_password.clone(),
        );
        let dashboard_service = DashboardService::new(collections.clone(), user_repo.clone());

        if config.seed_demo_data {
            let passwords = SeedPasswords {
                admin_hash: auth_service.hash_password(ADMIN_SEED_PASSWORD).await?,
                staff_hash: auth_service.hash_password(&config.default_staff_password).await?,
            };
            seed_demo_data(&collections, &passwords).await?;
        }

        Ok(Self {
            config: Arc::new(config),
            store,
            i18n_store: Arc::new(I18nStore::default()),
            user_repo,
            auth_service,
            collection_service,
            staff_service,
            dashboard_service,
        })
    }
}
