// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    services::identity::Identity,
};

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_owned())
}

// Token -> usuário -> papel + jurisdição, uma única vez por requisição
async fn identify(app_state: &AppState, token: &str) -> Result<Identity, AppError> {
    let user = app_state
        .auth_service
        .validate_token(token)
        .await
        .map_err(|e| match e {
            // Conta removida depois da emissão do token
            AppError::UserNotFound => AppError::InvalidToken,
            other => other,
        })?;

    app_state.identity_service.resolve(user).await
}

// O middleware em si
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale))?;

    let identity = identify(&app_state, &token)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    // Insere a identidade nos "extensions" da requisição
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

// Extrator para obter a identidade autenticada diretamente nos handlers
pub struct AuthenticatedUser(pub Identity);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&Locale::from_headers(&parts.headers)))
    }
}

/// Para rotas abertas: quem manda um token válido é identificado,
/// o resto segue como anônimo.
pub struct MaybeIdentity(pub Option<Identity>);

impl FromRequestParts<AppState> for MaybeIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(MaybeIdentity(Some(identity.clone())));
        }

        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(MaybeIdentity(None));
        };

        match identify(state, &token).await {
            Ok(identity) => Ok(MaybeIdentity(Some(identity))),
            Err(AppError::InvalidToken) => {
                tracing::debug!("Token inválido em rota aberta, seguindo como anônimo.");
                Ok(MaybeIdentity(None))
            }
            Err(e) => Err(e.to_api_error(&Locale::from_headers(&parts.headers))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def.ghi"));

        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);
    }
}
