// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::text;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    // A matrícula do servidor é o login
    #[schema(example = "102030")]
    pub username: String,

    #[schema(example = "Maria")]
    pub first_name: String,

    #[schema(example = "maria@saude.gov.br")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub is_superuser: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn display_name(&self) -> &str {
        text::display_name(&self.first_name, &self.username)
    }
}

// O papel resolvido uma única vez por requisição
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Coordinator,
    Manager,
    User,
}

// Dados para registro de um novo servidor
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(length(min = 1, max = 150, message = "A matrícula é obrigatória."))]
    #[schema(example = "102030")]
    pub username: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[serde(default)]
    #[validate(length(max = 150, message = "O nome é muito longo."))]
    #[schema(example = "Maria")]
    pub first_name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    #[validate(length(max = 100, message = "O cargo é muito longo."))]
    #[schema(example = "Enfermeira")]
    pub job_title: Option<String>,

    #[validate(length(max = 200, message = "A unidade deve ter até 200 caracteres."))]
    #[schema(example = "UBS Central")]
    pub unit: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "A matrícula é obrigatória."))]
    pub username: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// O que o frontend precisa para desenhar os botões certos
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub role: Role,
    pub job_title: String,
    pub unit: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, message = "Preencha todos os campos."))]
    pub old_password: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub new_password: String,
    #[validate(length(min = 1, message = "Preencha todos os campos."))]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordResetRequestPayload {
    #[validate(length(min = 1, message = "A matrícula é obrigatória."))]
    pub username: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequested {
    pub message: String,
    #[schema(example = "ma***@saude.gov.br")]
    pub masked_email: String,
    // Ausente quando a matrícula não existe (não revelamos isso)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetConfirmPayload {
    pub uid: Uuid,
    #[validate(length(min = 1, message = "Dados incompletos."))]
    pub token: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub new_password: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

// Claims do código de recuperação de senha
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetClaims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
    pub purpose: String,
    // Pedaço do hash atual: o código morre quando a senha muda
    pub fp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(unit: &str) -> RegisterUserPayload {
        RegisterUserPayload {
            username: "102030".into(),
            password: "segredo123".into(),
            first_name: "Maria".into(),
            email: None,
            job_title: None,
            unit: Some(unit.into()),
        }
    }

    #[test]
    fn unit_is_capped_at_profile_width() {
        assert!(register(&"U".repeat(200)).validate().is_ok());

        let err = register(&"U".repeat(201)).validate().unwrap_err();
        assert!(err.field_errors().contains_key("unit"));
    }
}
