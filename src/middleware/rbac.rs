// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    middleware::i18n::Locale,
    models::auth::Role,
    services::identity::Identity,
};

/// 1. O Trait que define quais papéis passam
pub trait RoleDef: Send + Sync + 'static {
    fn allows(role: Role) -> bool;
}

/// 2. O Extractor (Guardião). Depende do `auth_guard` ter rodado antes.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_headers(&parts.headers);

        let identity = parts
            .extensions
            .get::<Identity>()
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale))?;

        if !T::allows(identity.role) {
            tracing::warn!(
                "Acesso negado a {} ({:?}) em rota restrita.",
                identity.user.username,
                identity.role
            );
            return Err(AppError::AdminRequired.to_api_error(&locale));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct AdminOnly;
impl RoleDef for AdminOnly {
    fn allows(role: Role) -> bool {
        role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::identity;
    use axum::http::{Request, StatusCode};

    async fn guard(identity: Option<Identity>) -> Result<RequireRole<AdminOnly>, ApiError> {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        if let Some(identity) = identity {
            parts.extensions.insert(identity);
        }
        RequireRole::<AdminOnly>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn admin_passes() {
        assert!(guard(Some(identity("secretaria", Role::Admin, &[], &[]))).await.is_ok());
    }

    #[tokio::test]
    async fn coordinator_is_forbidden() {
        let err = guard(Some(identity("carla", Role::Coordinator, &[], &["UBS Central"])))
            .await
            .err()
            .unwrap();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.error, "Apenas administradores podem realizar esta ação.");
    }

    #[tokio::test]
    async fn missing_identity_is_unauthorized() {
        let err = guard(None).await.err().unwrap();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
}
