// src/handlers/organization.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{AdminOnly, RequireRole},
    },
    models::organization::{CreateDepartmentPayload, CreateUnitPayload, Department, Unit},
};

#[utoipa::path(
    get,
    path = "/api/setores",
    tag = "Organização",
    responses(
        (status = 200, description = "Nomes dos setores, em ordem alfabética", body = [String])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_units(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let names = app_state
        .org_repo
        .list_unit_names()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(names))
}

#[utoipa::path(
    post,
    path = "/api/setores",
    tag = "Organização",
    request_body = CreateUnitPayload,
    responses(
        (status = 201, description = "Setor criado", body = Unit),
        (status = 403, description = "Apenas administradores"),
        (status = 409, description = "Setor já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_unit(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    Json(payload): Json<CreateUnitPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let unit = app_state
        .org_repo
        .create_unit(payload.name.trim(), payload.department_id, payload.responsible_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!("🏥 Setor '{}' cadastrado.", unit.name);
    Ok((StatusCode::CREATED, Json(unit)))
}

#[utoipa::path(
    get,
    path = "/api/departamentos",
    tag = "Organização",
    responses(
        (status = 200, description = "Departamentos", body = [Department])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_departments(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let departments = app_state
        .org_repo
        .list_departments()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(departments))
}

#[utoipa::path(
    post,
    path = "/api/departamentos",
    tag = "Organização",
    request_body = CreateDepartmentPayload,
    responses(
        (status = 201, description = "Departamento criado", body = Department),
        (status = 403, description = "Apenas administradores"),
        (status = 409, description = "Departamento já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_department(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    Json(payload): Json<CreateDepartmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let department = app_state
        .org_repo
        .create_department(payload.name.trim(), payload.responsible_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    tracing::info!("🏛️ Departamento '{}' cadastrado.", department.name);
    Ok((StatusCode::CREATED, Json(department)))
}
