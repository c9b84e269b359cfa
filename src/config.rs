// src/config.rs

use std::{env, path::PathBuf, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{LeaveRequestRepository, OrganizationRepository, ProfileRepository, UserRepository},
    services::{
        auth::AuthService,
        document_service::{DocumentService, Letterhead},
        identity::IdentityService,
        leave_request_service::LeaveRequestService,
        profile_service::ProfileService,
    },
};

// Tudo que vem do ambiente (.env opcional)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub database_max_connections: u32,
    pub fonts_dir: PathBuf,
    pub font_family: String,
    pub document_issuer: String,
    pub document_department: String,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let database_max_connections = var_or("DATABASE_MAX_CONNECTIONS", "5")
            .parse()
            .context("DATABASE_MAX_CONNECTIONS deve ser um número")?;

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3000"),
            database_max_connections,
            fonts_dir: PathBuf::from(var_or("FONTS_DIR", "./fonts")),
            font_family: var_or("FONT_FAMILY", "Roboto"),
            document_issuer: var_or("DOCUMENT_ISSUER", "PREFEITURA DE SÃO JOSÉ DO RIO PRETO"),
            document_department: var_or("DOCUMENT_DEPARTMENT", "Secretaria Municipal de Saúde - SMS"),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Config,
    pub org_repo: OrganizationRepository,
    pub identity_service: IdentityService,
    pub auth_service: AuthService,
    pub profile_service: ProfileService,
    pub leave_request_service: LeaveRequestService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar no banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(config, db_pool))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(config: Config, db_pool: PgPool) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let profile_repo = ProfileRepository::new(db_pool.clone());
        let org_repo = OrganizationRepository::new(db_pool.clone());
        let leave_request_repo = LeaveRequestRepository::new(db_pool.clone());

        let identity_service = IdentityService::new(user_repo.clone(), org_repo.clone());
        let auth_service = AuthService::new(
            user_repo.clone(),
            profile_repo.clone(),
            identity_service.clone(),
            config.jwt_secret.clone(),
            db_pool.clone(),
        );
        let profile_service = ProfileService::new(user_repo, profile_repo.clone(), db_pool.clone());

        let document_service = DocumentService::new(
            config.fonts_dir.clone(),
            config.font_family.clone(),
            Letterhead {
                issuer: config.document_issuer.clone(),
                department: config.document_department.clone(),
            },
        );
        let leave_request_service =
            LeaveRequestService::new(leave_request_repo, profile_repo, document_service, db_pool.clone());

        Self {
            db_pool,
            config,
            org_repo,
            identity_service,
            auth_service,
            profile_service,
            leave_request_service,
        }
    }
}
