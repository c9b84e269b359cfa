// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
};

#[utoipa::path(
    get,
    path = "/api/solicitacoes/{id}/pdf",
    tag = "Solicitações",
    responses(
        (status = 200, description = "Requerimento em PDF", content_type = "application/pdf"),
        (status = 404, description = "Inexistente ou fora da sua jurisdição")
    ),
    params(
        ("id" = i64, Path, description = "ID da solicitação")
    ),
    security(("api_jwt" = []))
)]
pub async fn request_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let pdf_bytes = app_state
        .leave_request_service
        .render_pdf(&identity, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    // Configura os Headers para o navegador baixar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"dispensa_{}.pdf\"", id)),
    ];

    Ok((headers, pdf_bytes).into_response())
}
