// src/services/approval.rs
//
// Máquina de estados da aprovação:
//
//   PENDENTE_GERENTE -> PENDENTE_COORD -> PENDENTE_ADMIN -> APROVADO
//            \________________\_______________\_______-> CANCELADO
//
// `decide` só olha o estado e o papel de quem age; `apply` grava o resultado
// no registro. Uma decisão negada nunca toca no registro.

use chrono::{DateTime, Utc};

use crate::{
    common::error::AppError,
    models::{
        auth::Role,
        leave_request::{LeaveRequest, RequestStatus},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Manager,
    Coordinator,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// O papel não corresponde à etapa atual.
    WrongStage,
    /// A solicitação já foi concluída ou indeferida.
    AlreadyClosed,
}

impl Denial {
    pub fn message(self, english: bool) -> &'static str {
        match (self, english) {
            (Denial::WrongStage, false) => "Você não tem permissão para aprovar nesta fase.",
            (Denial::WrongStage, true) => "You are not allowed to approve at this stage.",
            (Denial::AlreadyClosed, false) => "Esta solicitação já foi encerrada.",
            (Denial::AlreadyClosed, true) => "This request is already closed.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Advance {
        next: RequestStatus,
        stage: Stage,
        signer: String,
    },
    Reject {
        reason: String,
    },
}

impl Transition {
    pub fn message(&self) -> &'static str {
        match self {
            Transition::Advance { next: RequestStatus::PendingCoordinator, .. } => {
                "Aprovado! Enviado para Coordenação."
            }
            Transition::Advance { next: RequestStatus::PendingAdmin, .. } => {
                "Aprovado! Enviado para Secretaria de Saúde."
            }
            Transition::Advance { .. } => "Solicitação Finalizada e Aprovada.",
            Transition::Reject { .. } => "Solicitação Indeferida/Cancelada.",
        }
    }
}

pub fn decide(
    status: RequestStatus,
    role: Role,
    signer: &str,
    action: Action,
) -> Result<Transition, AppError> {
    let advance = |next, stage| Transition::Advance {
        next,
        stage,
        signer: signer.to_string(),
    };

    match (action, status, role) {
        (_, RequestStatus::Rejected, _) => Err(AppError::PermissionDenied(Denial::AlreadyClosed)),

        (Action::Reject, status, _) if status.is_terminal() => {
            Err(AppError::PermissionDenied(Denial::AlreadyClosed))
        }
        (Action::Reject, _, _) => Ok(Transition::Reject {
            reason: format!("Reprovado por {}", signer),
        }),

        (Action::Approve, RequestStatus::PendingManager, Role::Manager) => {
            Ok(advance(RequestStatus::PendingCoordinator, Stage::Manager))
        }
        (Action::Approve, RequestStatus::PendingCoordinator, Role::Coordinator) => {
            Ok(advance(RequestStatus::PendingAdmin, Stage::Coordinator))
        }
        // Admin fecha de qualquer fase, e reaprovar um APROVADO não muda nada
        (Action::Approve, _, Role::Admin) => Ok(advance(RequestStatus::Approved, Stage::Admin)),

        (Action::Approve, status, _) if status.is_terminal() => {
            Err(AppError::PermissionDenied(Denial::AlreadyClosed))
        }
        (Action::Approve, _, _) => Err(AppError::PermissionDenied(Denial::WrongStage)),
    }
}

pub fn apply(request: &mut LeaveRequest, transition: &Transition, now: DateTime<Utc>) {
    match transition {
        Transition::Advance { next, stage, signer } => {
            request.status = *next;
            match stage {
                Stage::Manager => {
                    request.manager_signature = Some(signer.clone());
                    request.manager_approved_at = Some(now);
                }
                Stage::Coordinator => {
                    request.coordinator_signature = Some(signer.clone());
                    request.coordinator_approved_at = Some(now);
                }
                Stage::Admin => {
                    // Só assina se ainda não tiver assinado
                    let signed = request
                        .admin_signature
                        .as_deref()
                        .is_some_and(|s| !s.trim().is_empty());
                    if !signed {
                        request.admin_signature = Some(signer.clone());
                        request.admin_approved_at = Some(now);
                    }
                }
            }
        }
        Transition::Reject { reason } => {
            request.status = RequestStatus::Rejected;
            request.cancellation_reason = Some(reason.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{identity, request};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 2, hour, 0, 0).unwrap()
    }

    fn act(r: &mut LeaveRequest, role: Role, name: &str, action: Action, now: DateTime<Utc>) -> Result<(), AppError> {
        let transition = decide(r.status, role, name, action)?;
        apply(r, &transition, now);
        Ok(())
    }

    #[test]
    fn full_chain_records_three_signatures() {
        let manager = identity("Marcos", Role::Manager, &["UBS Central"], &[]);
        let coord = identity("Carla", Role::Coordinator, &[], &["UBS Central"]);
        let admin = identity("Ana", Role::Admin, &[], &[]);
        let mut r = request(1, Uuid::new_v4(), "UBS Central");

        act(&mut r, manager.role, manager.display_name(), Action::Approve, at(9)).unwrap();
        assert_eq!(r.status, RequestStatus::PendingCoordinator);
        assert_eq!(r.manager_signature.as_deref(), Some("Marcos"));
        assert_eq!(r.manager_approved_at, Some(at(9)));

        act(&mut r, coord.role, coord.display_name(), Action::Approve, at(10)).unwrap();
        assert_eq!(r.status, RequestStatus::PendingAdmin);
        assert_eq!(r.coordinator_signature.as_deref(), Some("Carla"));

        act(&mut r, admin.role, admin.display_name(), Action::Approve, at(11)).unwrap();
        assert_eq!(r.status, RequestStatus::Approved);
        assert_eq!(r.admin_signature.as_deref(), Some("Ana"));
        assert_eq!(r.admin_approved_at, Some(at(11)));
        assert!(r.cancellation_reason.is_none());
    }

    #[test]
    fn coordinator_cannot_skip_manager_stage() {
        let r = request(1, Uuid::new_v4(), "UBS Central");
        let err = decide(r.status, Role::Coordinator, "Carla", Action::Approve).unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(Denial::WrongStage)));
        assert_eq!(r.status, RequestStatus::PendingManager);
        assert!(r.coordinator_signature.is_none());
    }

    #[test]
    fn plain_users_and_managers_out_of_stage_are_denied() {
        for status in [RequestStatus::PendingManager, RequestStatus::PendingCoordinator, RequestStatus::PendingAdmin] {
            assert!(decide(status, Role::User, "João", Action::Approve).is_err());
        }
        assert!(decide(RequestStatus::PendingAdmin, Role::Manager, "Marcos", Action::Approve).is_err());
        assert!(decide(RequestStatus::PendingAdmin, Role::Coordinator, "Carla", Action::Approve).is_err());
    }

    #[test]
    fn manager_rejecting_at_admin_stage_cancels() {
        let mut r = request(1, Uuid::new_v4(), "UBS Central");
        r.status = RequestStatus::PendingAdmin;

        act(&mut r, Role::Manager, "Marcos", Action::Reject, at(9)).unwrap();
        assert_eq!(r.status, RequestStatus::Rejected);
        assert_eq!(r.cancellation_reason.as_deref(), Some("Reprovado por Marcos"));
    }

    #[test]
    fn reject_from_every_open_state_leaves_a_reason() {
        for status in [RequestStatus::PendingManager, RequestStatus::PendingCoordinator, RequestStatus::PendingAdmin] {
            for role in [Role::User, Role::Manager, Role::Coordinator, Role::Admin] {
                let mut r = request(1, Uuid::new_v4(), "CAPS");
                r.status = status;
                act(&mut r, role, "Fulano", Action::Reject, at(9)).unwrap();
                assert_eq!(r.status, RequestStatus::Rejected);
                assert!(r.cancellation_reason.as_deref().is_some_and(|s| !s.is_empty()));
            }
        }
    }

    #[test]
    fn closed_requests_cannot_be_rejected() {
        for status in [RequestStatus::Approved, RequestStatus::Rejected] {
            let err = decide(status, Role::Admin, "Ana", Action::Reject).unwrap_err();
            assert!(matches!(err, AppError::PermissionDenied(Denial::AlreadyClosed)));
        }
    }

    #[test]
    fn admin_override_jumps_straight_to_approved() {
        let mut r = request(1, Uuid::new_v4(), "UBS Central");
        act(&mut r, Role::Admin, "Ana", Action::Approve, at(9)).unwrap();

        assert_eq!(r.status, RequestStatus::Approved);
        assert_eq!(r.admin_signature.as_deref(), Some("Ana"));
        assert!(r.manager_signature.is_none());
        assert!(r.coordinator_signature.is_none());
    }

    #[test]
    fn admin_reapproval_keeps_first_signature() {
        let mut r = request(1, Uuid::new_v4(), "UBS Central");
        r.status = RequestStatus::PendingAdmin;
        act(&mut r, Role::Admin, "Ana", Action::Approve, at(9)).unwrap();
        act(&mut r, Role::Admin, "Beatriz", Action::Approve, at(15)).unwrap();

        assert_eq!(r.status, RequestStatus::Approved);
        assert_eq!(r.admin_signature.as_deref(), Some("Ana"));
        assert_eq!(r.admin_approved_at, Some(at(9)));
    }

    #[test]
    fn nobody_reopens_a_rejected_request() {
        let err = decide(RequestStatus::Rejected, Role::Admin, "Ana", Action::Approve).unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(Denial::AlreadyClosed)));
        for role in [Role::User, Role::Manager, Role::Coordinator] {
            let err = decide(RequestStatus::Approved, role, "Marcos", Action::Approve).unwrap_err();
            assert!(matches!(err, AppError::PermissionDenied(Denial::AlreadyClosed)));
        }
    }

    #[test]
    fn signer_falls_back_to_username() {
        let mut manager = identity("m", Role::Manager, &[], &[]);
        manager.user.first_name = String::new();
        manager.user.username = "998877".into();

        let t = decide(RequestStatus::PendingManager, manager.role, manager.display_name(), Action::Approve).unwrap();
        assert_eq!(
            t,
            Transition::Advance {
                next: RequestStatus::PendingCoordinator,
                stage: Stage::Manager,
                signer: "998877".into()
            }
        );
        assert_eq!(t.message(), "Aprovado! Enviado para Coordenação.");
    }
}
