// src/handlers/leave_requests.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::{AuthenticatedUser, MaybeIdentity},
        i18n::Locale,
    },
    models::leave_request::{CreateLeaveRequestPayload, LeaveRequest, LeaveRequestView, TransitionResponse},
    services::approval::Action,
};

#[utoipa::path(
    get,
    path = "/api/solicitacoes",
    tag = "Solicitações",
    responses(
        (status = 200, description = "Solicitações visíveis (vazio para anônimo)", body = [LeaveRequestView])
    ),
    security((), ("api_jwt" = []))
)]
pub async fn list_requests(
    State(app_state): State<AppState>,
    locale: Locale,
    MaybeIdentity(identity): MaybeIdentity,
) -> Result<impl IntoResponse, ApiError> {
    let requests = app_state
        .leave_request_service
        .list(identity.as_ref())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(requests))
}

#[utoipa::path(
    post,
    path = "/api/solicitacoes",
    tag = "Solicitações",
    request_body = CreateLeaveRequestPayload,
    responses(
        (status = 201, description = "Solicitação criada em PENDENTE_GERENTE", body = LeaveRequest)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_request(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(identity): AuthenticatedUser,
    Json(payload): Json<CreateLeaveRequestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let request = app_state
        .leave_request_service
        .create(&identity, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(request)))
}

#[utoipa::path(
    get,
    path = "/api/solicitacoes/{id}",
    tag = "Solicitações",
    responses(
        (status = 200, description = "Solicitação", body = LeaveRequestView),
        (status = 404, description = "Inexistente ou fora da sua jurisdição")
    ),
    params(
        ("id" = i64, Path, description = "ID da solicitação")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_request(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let request = app_state
        .leave_request_service
        .get(&identity, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(request))
}

#[utoipa::path(
    post,
    path = "/api/solicitacoes/{id}/aprovar",
    tag = "Solicitações",
    responses(
        (status = 200, description = "Etapa assinada", body = TransitionResponse),
        (status = 403, description = "Fase errada ou solicitação encerrada")
    ),
    params(
        ("id" = i64, Path, description = "ID da solicitação")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_request(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let response = app_state
        .leave_request_service
        .transition(&identity, id, Action::Approve)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/solicitacoes/{id}/reprovar",
    tag = "Solicitações",
    responses(
        (status = 200, description = "Solicitação indeferida", body = TransitionResponse),
        (status = 403, description = "Solicitação já encerrada")
    ),
    params(
        ("id" = i64, Path, description = "ID da solicitação")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_request(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let response = app_state
        .leave_request_service
        .transition(&identity, id, Action::Reject)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(response))
}
