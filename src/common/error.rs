// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;
use crate::services::approval::Denial;

// Erros de domínio. Os handlers convertem para `ApiError` com o idioma do cliente.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Validação que não vem de um `#[validate]` (ex: senhas que não conferem)
    #[error("Dados inválidos: {0}")]
    InvalidInput(&'static str),

    #[error("Matrícula já cadastrada")]
    UsernameAlreadyExists,

    #[error("Registro duplicado: {0}")]
    UniqueConstraintViolation(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Código de recuperação inválido")]
    InvalidResetToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Permissão negada: {0:?}")]
    PermissionDenied(Denial),

    // Rotas de cadastro da hierarquia
    #[error("Acesso restrito a administradores")]
    AdminRequired,

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro que de fato vai para o cliente
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) | AppError::InvalidResetToken => {
                StatusCode::BAD_REQUEST
            }
            AppError::UsernameAlreadyExists | AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::UserNotFound | AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::PermissionDenied(_) | AppError::AdminRequired => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_api_error(self, locale: &Locale) -> ApiError {
        let english = locale.is_english();
        let status = self.status();

        let error = match &self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => Value::String(m.to_string()),
                            None => Value::String(e.code.to_string()),
                        })
                        .collect();
                    details.insert(field.to_string(), Value::Array(messages));
                }
                let error = if english {
                    "One or more fields are invalid."
                } else {
                    "Um ou mais campos são inválidos."
                };
                return ApiError {
                    status,
                    error: error.to_string(),
                    details: Some(Value::Object(details)),
                };
            }
            AppError::InvalidInput(reason) => reason.to_string(),
            AppError::UsernameAlreadyExists => pick(english, "This registration number is already in use.", "Esta matrícula já possui cadastro."),
            AppError::UniqueConstraintViolation(what) => {
                if english {
                    format!("A record with this value already exists: {}", what)
                } else {
                    format!("Já existe um registro com este valor: {}", what)
                }
            }
            AppError::InvalidCredentials => pick(english, "Invalid registration number or password.", "Matrícula ou senha incorretos."),
            AppError::InvalidToken => pick(english, "Missing or invalid authentication token.", "Token de autenticação inválido ou ausente."),
            AppError::InvalidResetToken => pick(english, "Invalid or expired code.", "Código inválido ou expirado."),
            AppError::UserNotFound => pick(english, "User not found.", "Usuário não encontrado."),
            AppError::ResourceNotFound(what) => {
                if english {
                    format!("Not found: {}", what)
                } else {
                    format!("Não encontrado: {}", what)
                }
            }
            AppError::PermissionDenied(denial) => denial.message(english).to_string(),
            AppError::AdminRequired => pick(english, "Only administrators can perform this action.", "Apenas administradores podem realizar esta ação."),
            ref e => {
                tracing::error!("🔥 Erro Interno do Servidor: {}", e);
                pick(english, "An unexpected error occurred.", "Ocorreu um erro inesperado.")
            }
        };

        ApiError { status, error, details: None }
    }
}

fn pick(english: bool, en: &str, pt: &str) -> String {
    if english { en.to_string() } else { pt.to_string() }
}

// Usado pelos extratores, que não conhecem o idioma: cai no padrão (pt)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
        password: String,
    }

    #[test]
    fn taxonomy_maps_to_http_status() {
        assert_eq!(AppError::PermissionDenied(Denial::WrongStage).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::AdminRequired.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::ResourceNotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidInput("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::UsernameAlreadyExists.status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let errors = Payload { password: "123".into() }.validate().unwrap_err();
        let api = AppError::ValidationError(errors).to_api_error(&Locale::default());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("details");
        assert_eq!(details["password"][0], "A senha deve ter no mínimo 6 caracteres.");
    }

    #[test]
    fn messages_follow_locale() {
        let pt = AppError::InvalidCredentials.to_api_error(&Locale("pt".into()));
        let en = AppError::InvalidCredentials.to_api_error(&Locale("en".into()));
        assert_eq!(pt.error, "Matrícula ou senha incorretos.");
        assert_eq!(en.error, "Invalid registration number or password.");
    }

    #[test]
    fn internal_errors_hide_details() {
        let api = AppError::InternalServerError(anyhow::anyhow!("senha do banco: hunter2"))
            .to_api_error(&Locale::default());
        assert_eq!(api.error, "Ocorreu um erro inesperado.");
    }
}
