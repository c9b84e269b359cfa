// src/models/organization.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Departamento: nível dos COORDENADORES
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i64,
    #[schema(example = "Departamento de Atenção Básica")]
    pub name: String,
    pub responsible_id: Option<Uuid>,
}

// ---
// Setor: nível dos GERENTES (UBS, UPA, CAPS...)
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: i64,
    #[schema(example = "UBS Central")]
    pub name: String,
    pub department_id: i64,
    pub responsible_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentPayload {
    #[validate(length(min = 1, max = 200, message = "O nome do departamento é obrigatório."))]
    pub name: String,
    // Coordenador responsável
    pub responsible_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnitPayload {
    #[validate(length(min = 1, max = 200, message = "O nome do setor é obrigatório."))]
    pub name: String,
    pub department_id: i64,
    // Gerente responsável
    pub responsible_id: Option<Uuid>,
}
