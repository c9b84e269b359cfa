// src/models/leave_request.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Enums ---
// Os valores no banco/JSON são os mesmos que o frontend já conhece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_status")]
pub enum RequestStatus {
    #[sqlx(rename = "PENDENTE_GERENTE")]
    #[serde(rename = "PENDENTE_GERENTE")]
    PendingManager,

    #[sqlx(rename = "PENDENTE_COORD")]
    #[serde(rename = "PENDENTE_COORD")]
    PendingCoordinator,

    #[sqlx(rename = "PENDENTE_ADMIN")]
    #[serde(rename = "PENDENTE_ADMIN")]
    PendingAdmin,

    #[sqlx(rename = "APROVADO")]
    #[serde(rename = "APROVADO")]
    Approved,

    #[sqlx(rename = "CANCELADO")]
    #[serde(rename = "CANCELADO")]
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Rejected)
    }

    pub fn label(self) -> &'static str {
        match self {
            RequestStatus::PendingManager => "Aguardando Gerente",
            RequestStatus::PendingCoordinator => "Aguardando Coordenação",
            RequestStatus::PendingAdmin => "Aguardando Secretaria",
            RequestStatus::Approved => "Concluído",
            RequestStatus::Rejected => "Indeferido",
        }
    }
}

// O que sai do banco (Tabela leave_requests)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    #[schema(example = 42)]
    pub id: i64,
    pub requester_id: Uuid,

    // Dados básicos
    #[schema(example = "102030")]
    pub registration_number: String,
    #[schema(example = "UBS Central")]
    pub unit: String,
    #[schema(example = "Enfermeira")]
    pub job_title: String,

    // Dados do evento
    #[schema(example = "Congresso Paulista de Saúde Pública")]
    pub event_name: String,
    pub objective: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[schema(example = "Campinas")]
    pub city: String,
    #[schema(example = "SP")]
    pub state: String,

    pub sigm_protocol: Option<String>,
    pub type_invitation: bool,
    pub type_schedule: bool,
    pub type_summons: bool,
    pub type_other: bool,

    // Assinaturas (servidor, gerente, coordenador, secretaria)
    pub requester_signature: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub manager_signature: Option<String>,
    pub manager_approved_at: Option<DateTime<Utc>>,
    pub coordinator_signature: Option<String>,
    pub coordinator_approved_at: Option<DateTime<Utc>>,
    pub admin_signature: Option<String>,
    pub admin_approved_at: Option<DateTime<Utc>>,

    pub status: RequestStatus,
    pub cancellation_reason: Option<String>,
}

// Linha da listagem: a solicitação + quem pediu
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub request: LeaveRequest,
    pub requester_username: String,
    pub requester_first_name: String,
}

fn validate_period(payload: &CreateLeaveRequestPayload) -> Result<(), ValidationError> {
    if payload.end_date < payload.start_date {
        let mut err = ValidationError::new("period");
        err.message = Some("A data final não pode ser anterior à data inicial.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_period"))]
pub struct CreateLeaveRequestPayload {
    // Sem matrícula, cargo ou unidade usamos os dados do perfil
    #[validate(length(min = 1, max = 20, message = "A matrícula deve ter até 20 caracteres."))]
    pub registration_number: Option<String>,

    #[validate(length(min = 1, max = 200, message = "A unidade deve ter até 200 caracteres."))]
    pub unit: Option<String>,

    #[validate(length(min = 1, max = 100, message = "O cargo deve ter até 100 caracteres."))]
    pub job_title: Option<String>,

    #[validate(length(min = 1, max = 200, message = "O nome do evento é obrigatório."))]
    pub event_name: String,

    #[validate(length(min = 1, message = "O objetivo é obrigatório."))]
    pub objective: String,

    #[schema(example = "2026-03-10")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-12")]
    pub end_date: NaiveDate,

    #[validate(length(min = 1, max = 100, message = "A cidade é obrigatória."))]
    pub city: String,

    #[validate(length(min = 1, max = 50, message = "O estado é obrigatório."))]
    pub state: String,

    #[validate(length(max = 50, message = "O protocolo deve ter até 50 caracteres."))]
    pub sigm_protocol: Option<String>,

    #[serde(default)]
    pub type_invitation: bool,
    #[serde(default)]
    pub type_schedule: bool,
    #[serde(default)]
    pub type_summons: bool,
    #[serde(default)]
    pub type_other: bool,
}

// O payload já completado com os dados do perfil, pronto para o INSERT
#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub requester_id: Uuid,
    pub registration_number: String,
    pub unit: String,
    pub job_title: String,
    pub event_name: String,
    pub objective: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub city: String,
    pub state: String,
    pub sigm_protocol: Option<String>,
    pub type_invitation: bool,
    pub type_schedule: bool,
    pub type_summons: bool,
    pub type_other: bool,
    pub requester_signature: String,
}

// Resposta de aprovar/reprovar
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponse {
    pub id: i64,
    pub status: RequestStatus,
    #[schema(example = "Aprovado! Enviado para Coordenação.")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(start: NaiveDate, end: NaiveDate) -> CreateLeaveRequestPayload {
        CreateLeaveRequestPayload {
            registration_number: None,
            unit: None,
            job_title: None,
            event_name: "Congresso".into(),
            objective: "Atualização".into(),
            start_date: start,
            end_date: end,
            city: "Campinas".into(),
            state: "SP".into(),
            sigm_protocol: None,
            type_invitation: true,
            type_schedule: false,
            type_summons: false,
            type_other: false,
        }
    }

    #[test]
    fn rejects_inverted_period() {
        let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        assert!(payload(d(10), d(12)).validate().is_ok());
        assert!(payload(d(12), d(12)).validate().is_ok());
        assert!(payload(d(12), d(10)).validate().is_err());
    }

    #[test]
    fn status_uses_legacy_wire_values() {
        let json = serde_json::to_string(&RequestStatus::PendingCoordinator).unwrap();
        assert_eq!(json, "\"PENDENTE_COORD\"");
        let parsed: RequestStatus = serde_json::from_str("\"CANCELADO\"").unwrap();
        assert_eq!(parsed, RequestStatus::Rejected);
        assert!(parsed.is_terminal());
        assert!(!RequestStatus::PendingAdmin.is_terminal());
    }
}
