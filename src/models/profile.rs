// src/models/profile.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_JOB_TITLE: &str = "Servidor";
pub const DEFAULT_UNIT: &str = "Não definida";

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[schema(ignore)]
    pub user_id: Uuid,
    #[schema(example = "Enfermeira")]
    pub job_title: String,
    #[schema(example = "UBS Central")]
    pub unit: String,
    pub updated_at: DateTime<Utc>,
}

// GET /api/users/me
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyData {
    pub name: String,
    pub email: String,
    pub username: String,
    pub job_title: String,
    pub unit: String,
}

// PATCH /api/users/me: todos os campos são opcionais
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(length(max = 150, message = "O nome é muito longo."))]
    pub name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    #[validate(length(max = 100, message = "O cargo é muito longo."))]
    pub job_title: Option<String>,

    #[validate(length(max = 200, message = "A unidade deve ter até 200 caracteres."))]
    pub unit: Option<String>,
}
