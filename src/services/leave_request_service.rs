// src/services/leave_request_service.rs

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    common::{
        error::AppError,
        text::{display_name, non_blank},
    },
    db::{LeaveRequestRepository, ProfileRepository},
    models::leave_request::{
        CreateLeaveRequestPayload, LeaveRequest, LeaveRequestView, NewLeaveRequest, TransitionResponse,
    },
    services::{
        approval::{self, Action},
        document_service::{DocumentService, RequestDocument, RequesterInfo},
        identity::Identity,
        visibility::Visibility,
    },
};

fn not_found(id: i64) -> AppError {
    AppError::ResourceNotFound(format!("Solicitação {}", id))
}

// Campo opcional do formulário: vazio conta como ausente
fn given(value: Option<String>) -> Option<String> {
    non_blank(value.as_deref()).map(str::to_string)
}

#[derive(Clone)]
pub struct LeaveRequestService {
    repo: LeaveRequestRepository,
    profile_repo: ProfileRepository,
    document_service: DocumentService,
    pool: PgPool,
}

impl LeaveRequestService {
    pub fn new(
        repo: LeaveRequestRepository,
        profile_repo: ProfileRepository,
        document_service: DocumentService,
        pool: PgPool,
    ) -> Self {
        Self { repo, profile_repo, document_service, pool }
    }

    // Anônimo recebe lista vazia, nunca erro
    pub async fn list(&self, caller: Option<&Identity>) -> Result<Vec<LeaveRequestView>, AppError> {
        self.repo.list_visible(&Visibility::for_caller(caller)).await
    }

    pub async fn create(
        &self,
        identity: &Identity,
        payload: CreateLeaveRequestPayload,
    ) -> Result<LeaveRequest, AppError> {
        // Matrícula, cargo e unidade: o que veio no formulário, senão o perfil
        let profile = self.profile_repo.get_or_create(identity.user.id).await?;

        let new = NewLeaveRequest {
            requester_id: identity.user.id,
            registration_number: given(payload.registration_number)
                .unwrap_or_else(|| identity.user.username.clone()),
            unit: given(payload.unit).unwrap_or(profile.unit),
            job_title: given(payload.job_title).unwrap_or(profile.job_title),
            event_name: payload.event_name.trim().to_string(),
            objective: payload.objective.trim().to_string(),
            start_date: payload.start_date,
            end_date: payload.end_date,
            city: payload.city.trim().to_string(),
            state: payload.state.trim().to_string(),
            sigm_protocol: given(payload.sigm_protocol),
            type_invitation: payload.type_invitation,
            type_schedule: payload.type_schedule,
            type_summons: payload.type_summons,
            type_other: payload.type_other,
            requester_signature: identity.display_name().to_string(),
        };

        let request = self.repo.create(&new).await?;

        tracing::info!(
            "📝 Solicitação #{} criada por {} ({}).",
            request.id,
            identity.user.username,
            request.unit
        );
        Ok(request)
    }

    // Fora do recorte visível é 404: não revelamos que a solicitação existe
    pub async fn get(&self, identity: &Identity, id: i64) -> Result<LeaveRequestView, AppError> {
        let view = self.repo.find_view(id).await?.ok_or_else(|| not_found(id))?;

        if !Visibility::for_caller(Some(identity)).permits(&view.request) {
            return Err(not_found(id));
        }
        Ok(view)
    }

    pub async fn transition(
        &self,
        identity: &Identity,
        id: i64,
        action: Action,
    ) -> Result<TransitionResponse, AppError> {
        // 1. Trava a linha: duas aprovações simultâneas não se intercalam
        let mut tx = self.pool.begin().await?;

        let mut request = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .filter(|r| Visibility::for_caller(Some(identity)).permits(r))
            .ok_or_else(|| not_found(id))?;

        // 2. Decide (erro aqui = rollback no drop, nada é gravado)
        let previous = request.status;
        let transition = approval::decide(request.status, identity.role, identity.display_name(), action)?;
        approval::apply(&mut request, &transition, Utc::now());

        // 3. Grava
        let saved = self.repo.save_approval(&mut *tx, &request).await?;
        tx.commit().await?;

        tracing::info!(
            "✅ Solicitação #{}: {:?} -> {:?} por {} ({:?}).",
            saved.id,
            previous,
            saved.status,
            identity.user.username,
            identity.role
        );

        Ok(TransitionResponse {
            id: saved.id,
            status: saved.status,
            message: transition.message().to_string(),
        })
    }

    pub async fn render_pdf(&self, identity: &Identity, id: i64) -> Result<Vec<u8>, AppError> {
        let view = self.get(identity, id).await?;

        // Perfil do dono é opcional: sem ele, valem os dados gravados na solicitação
        let profile = self.profile_repo.find(view.request.requester_id).await?;
        let requester = RequesterInfo {
            name: display_name(&view.requester_first_name, &view.requester_username).to_string(),
            job_title: profile.as_ref().map(|p| p.job_title.clone()),
            unit: profile.map(|p| p.unit),
        };

        let document = RequestDocument::build(&view.request, &requester, self.document_service.letterhead());
        self.document_service.render(document).await
    }
}
