// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::request_password_reset,
        handlers::auth::confirm_password_reset,

        // --- Users ---
        handlers::profile::get_me,
        handlers::profile::update_me,
        handlers::profile::change_password,

        // --- Solicitações ---
        handlers::leave_requests::list_requests,
        handlers::leave_requests::create_request,
        handlers::leave_requests::get_request,
        handlers::leave_requests::approve_request,
        handlers::leave_requests::reject_request,
        handlers::documents::request_pdf,

        // --- Organização ---
        handlers::organization::list_units,
        handlers::organization::create_unit,
        handlers::organization::list_departments,
        handlers::organization::create_department,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::SessionUser,
            models::auth::AuthResponse,
            models::auth::ChangePasswordPayload,
            models::auth::PasswordResetRequestPayload,
            models::auth::PasswordResetRequested,
            models::auth::PasswordResetConfirmPayload,

            // --- Users ---
            models::profile::MyData,
            models::profile::UpdateProfilePayload,

            // --- Solicitações ---
            models::leave_request::RequestStatus,
            models::leave_request::LeaveRequest,
            models::leave_request::LeaveRequestView,
            models::leave_request::CreateLeaveRequestPayload,
            models::leave_request::TransitionResponse,

            // --- Organização ---
            models::organization::Department,
            models::organization::Unit,
            models::organization::CreateDepartmentPayload,
            models::organization::CreateUnitPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação, Registro e Recuperação de Senha"),
        (name = "Users", description = "Dados do Servidor e Perfil"),
        (name = "Solicitações", description = "Pedidos de Dispensa e Fluxo de Aprovação"),
        (name = "Organização", description = "Departamentos (Coordenação) e Setores (Gerência)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
