// src/test_support.rs
// Fixtures compartilhadas pelos testes unitários.

use std::path::PathBuf;

use chrono::{NaiveDate, TimeZone, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::{LeaveRequestRepository, OrganizationRepository, ProfileRepository, UserRepository},
    models::{
        auth::{Role, User},
        leave_request::{CreateLeaveRequestPayload, LeaveRequest, NewLeaveRequest, RequestStatus},
        organization::Unit,
    },
    services::{
        document_service::{DocumentService, Letterhead},
        identity::{Identity, IdentityService},
        leave_request_service::LeaveRequestService,
    },
};

pub fn user(username: &str, first_name: &str) -> User {
    let now = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
    User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        first_name: first_name.to_string(),
        email: format!("{username}@saude.gov.br"),
        password_hash: String::new(),
        is_superuser: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn identity(name: &str, role: Role, managed: &[&str], coordinated: &[&str]) -> Identity {
    let mut user = user(name, name);
    user.is_superuser = role == Role::Admin;
    Identity {
        user,
        role,
        managed_units: managed.iter().map(|s| s.to_string()).collect(),
        coordinated_units: coordinated.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn request(id: i64, owner: Uuid, unit: &str) -> LeaveRequest {
    LeaveRequest {
        id,
        requester_id: owner,
        registration_number: "102030".into(),
        unit: unit.to_string(),
        job_title: "Enfermeira".into(),
        event_name: "Congresso Paulista de Saúde Pública".into(),
        objective: "Atualização em vigilância epidemiológica.".into(),
        start_date: NaiveDate::from_ymd_opt(2026, 3, 10),
        end_date: NaiveDate::from_ymd_opt(2026, 3, 12),
        city: "Campinas".into(),
        state: "SP".into(),
        sigm_protocol: None,
        type_invitation: true,
        type_schedule: false,
        type_summons: false,
        type_other: false,
        requester_signature: Some("Maria".into()),
        submitted_at: Utc.with_ymd_and_hms(2026, 2, 1, 10, 30, 0).unwrap(),
        manager_signature: None,
        manager_approved_at: None,
        coordinator_signature: None,
        coordinator_approved_at: None,
        admin_signature: None,
        admin_approved_at: None,
        status: RequestStatus::PendingManager,
        cancellation_reason: None,
    }
}

// --- Banco (testes com #[sqlx::test]) ---

pub async fn insert_user(pool: &PgPool, username: &str, first_name: &str, groups: &[&str]) -> User {
    let user = UserRepository::new(pool.clone())
        .create_user(pool, username, first_name, "", "hash-de-teste")
        .await
        .unwrap();
    for group in groups {
        sqlx::query("INSERT INTO user_groups (user_id, group_name) VALUES ($1, $2)")
            .bind(user.id)
            .bind(*group)
            .execute(pool)
            .await
            .unwrap();
    }
    user
}

pub async fn insert_admin(pool: &PgPool, username: &str, first_name: &str) -> User {
    let mut user = insert_user(pool, username, first_name, &[]).await;
    sqlx::query("UPDATE users SET is_superuser = TRUE WHERE id = $1")
        .bind(user.id)
        .execute(pool)
        .await
        .unwrap();
    user.is_superuser = true;
    user
}

// Setor com gerente, dentro de um departamento próprio com coordenador
pub async fn insert_unit(pool: &PgPool, name: &str, manager: Option<Uuid>, coordinator: Option<Uuid>) -> Unit {
    let org = OrganizationRepository::new(pool.clone());
    let department = org
        .create_department(&format!("Departamento {name}"), coordinator)
        .await
        .unwrap();
    org.create_unit(name, department.id, manager).await.unwrap()
}

pub async fn identify(pool: &PgPool, user: User) -> Identity {
    IdentityService::new(UserRepository::new(pool.clone()), OrganizationRepository::new(pool.clone()))
        .resolve(user)
        .await
        .unwrap()
}

pub fn new_request(owner: &User, unit: &str) -> NewLeaveRequest {
    NewLeaveRequest {
        requester_id: owner.id,
        registration_number: "102030".into(),
        unit: unit.to_string(),
        job_title: "Enfermeira".into(),
        event_name: "Congresso Paulista de Saúde Pública".into(),
        objective: "Atualização em vigilância epidemiológica.".into(),
        start_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
        city: "Campinas".into(),
        state: "SP".into(),
        sigm_protocol: None,
        type_invitation: true,
        type_schedule: false,
        type_summons: false,
        type_other: false,
        requester_signature: owner.display_name().to_string(),
    }
}

pub fn create_payload(unit: Option<&str>) -> CreateLeaveRequestPayload {
    CreateLeaveRequestPayload {
        registration_number: None,
        unit: unit.map(str::to_string),
        job_title: None,
        event_name: "Congresso Paulista de Saúde Pública".into(),
        objective: "Atualização em vigilância epidemiológica.".into(),
        start_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
        city: "Campinas".into(),
        state: "SP".into(),
        sigm_protocol: None,
        type_invitation: true,
        type_schedule: false,
        type_summons: false,
        type_other: false,
    }
}

pub fn leave_request_service(pool: &PgPool) -> LeaveRequestService {
    let document_service = DocumentService::new(
        PathBuf::from("./fonts"),
        "Roboto".into(),
        Letterhead {
            issuer: "PREFEITURA".into(),
            department: "SMS".into(),
        },
    );
    LeaveRequestService::new(
        LeaveRequestRepository::new(pool.clone()),
        ProfileRepository::new(pool.clone()),
        document_service,
        pool.clone(),
    )
}
