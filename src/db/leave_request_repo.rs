// src/db/leave_request_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::leave_request::{LeaveRequest, LeaveRequestView, NewLeaveRequest},
    services::visibility::Visibility,
};

const REQUEST_COLUMNS: &str = r#"
    r.id, r.requester_id, r.registration_number, r.unit, r.job_title,
    r.event_name, r.objective, r.start_date, r.end_date, r.city, r.state,
    r.sigm_protocol, r.type_invitation, r.type_schedule, r.type_summons, r.type_other,
    r.requester_signature, r.submitted_at,
    r.manager_signature, r.manager_approved_at,
    r.coordinator_signature, r.coordinator_approved_at,
    r.admin_signature, r.admin_approved_at,
    r.status, r.cancellation_reason
"#;

fn view_select() -> String {
    format!(
        r#"
        SELECT {REQUEST_COLUMNS},
               u.username AS requester_username,
               u.first_name AS requester_first_name
        FROM leave_requests r
        JOIN users u ON u.id = r.requester_id
        "#
    )
}

#[derive(Clone)]
pub struct LeaveRequestRepository {
    pool: PgPool,
}

impl LeaveRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Nasce sempre em PENDENTE_GERENTE (default da coluna)
    pub async fn create(&self, new: &NewLeaveRequest) -> Result<LeaveRequest, AppError> {
        let request = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            INSERT INTO leave_requests AS r (
                requester_id, registration_number, unit, job_title,
                event_name, objective, start_date, end_date, city, state,
                sigm_protocol, type_invitation, type_schedule, type_summons, type_other,
                requester_signature
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(new.requester_id)
        .bind(&new.registration_number)
        .bind(&new.unit)
        .bind(&new.job_title)
        .bind(&new.event_name)
        .bind(&new.objective)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(&new.city)
        .bind(&new.state)
        .bind(&new.sigm_protocol)
        .bind(new.type_invitation)
        .bind(new.type_schedule)
        .bind(new.type_summons)
        .bind(new.type_other)
        .bind(&new.requester_signature)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    /// Lista o recorte visível, do mais novo para o mais antigo.
    /// Uma linha por solicitação: o OR no WHERE já elimina duplicatas.
    pub async fn list_visible(&self, scope: &Visibility) -> Result<Vec<LeaveRequestView>, AppError> {
        let rows = match scope {
            Visibility::Nothing => return Ok(Vec::new()),
            Visibility::Everything => {
                sqlx::query_as::<_, LeaveRequestView>(&format!("{} ORDER BY r.id DESC", view_select()))
                    .fetch_all(&self.pool)
                    .await?
            }
            Visibility::Scoped { owner_id, units } => {
                let units: Vec<String> = units.iter().cloned().collect();
                sqlx::query_as::<_, LeaveRequestView>(&format!(
                    "{} WHERE r.requester_id = $1 OR r.unit = ANY($2) ORDER BY r.id DESC",
                    view_select()
                ))
                .bind(owner_id)
                .bind(units)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    pub async fn find_view(&self, id: i64) -> Result<Option<LeaveRequestView>, AppError> {
        let row = sqlx::query_as::<_, LeaveRequestView>(&format!("{} WHERE r.id = $1", view_select()))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    // Dentro de uma transação: trava a linha até o commit
    pub async fn find_for_update<'e, E>(&self, executor: E, id: i64) -> Result<Option<LeaveRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, LeaveRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM leave_requests r WHERE r.id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    // Grava apenas os campos que a máquina de estados pode mexer
    pub async fn save_approval<'e, E>(&self, executor: E, request: &LeaveRequest) -> Result<LeaveRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let saved = sqlx::query_as::<_, LeaveRequest>(&format!(
            r#"
            UPDATE leave_requests AS r
            SET status = $2,
                manager_signature = $3,
                manager_approved_at = $4,
                coordinator_signature = $5,
                coordinator_approved_at = $6,
                admin_signature = $7,
                admin_approved_at = $8,
                cancellation_reason = $9
            WHERE r.id = $1
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(request.id)
        .bind(request.status)
        .bind(&request.manager_signature)
        .bind(request.manager_approved_at)
        .bind(&request.coordinator_signature)
        .bind(request.coordinator_approved_at)
        .bind(&request.admin_signature)
        .bind(request.admin_approved_at)
        .bind(&request.cancellation_reason)
        .fetch_one(executor)
        .await?;

        Ok(saved)
    }
}
