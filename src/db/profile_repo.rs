// src/db/profile_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::profile::{UserProfile, DEFAULT_JOB_TITLE, DEFAULT_UNIT},
};

#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT user_id, job_title, unit, updated_at FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    // Todo usuário tem exatamente um perfil: cria na hora se faltar.
    // O CTE devolve a linha inserida ou, se já existia, a atual.
    pub async fn get_or_create(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            WITH inserted AS (
                INSERT INTO user_profiles (user_id, job_title, unit)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id) DO NOTHING
                RETURNING user_id, job_title, unit, updated_at
            )
            SELECT user_id, job_title, unit, updated_at FROM inserted
            UNION ALL
            SELECT user_id, job_title, unit, updated_at FROM user_profiles WHERE user_id = $1
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(DEFAULT_JOB_TITLE)
        .bind(DEFAULT_UNIT)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }

    // UPSERT: campos ausentes mantêm o valor atual (ou o padrão, se o perfil é novo)
    pub async fn upsert<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        job_title: Option<&str>,
        unit: Option<&str>,
    ) -> Result<UserProfile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles (user_id, job_title, unit)
            VALUES ($1, COALESCE($2, $4), COALESCE($3, $5))
            ON CONFLICT (user_id)
            DO UPDATE SET
                job_title = COALESCE($2, user_profiles.job_title),
                unit = COALESCE($3, user_profiles.unit),
                updated_at = NOW()
            RETURNING user_id, job_title, unit, updated_at
            "#,
        )
        .bind(user_id)
        .bind(job_title)
        .bind(unit)
        .bind(DEFAULT_JOB_TITLE)
        .bind(DEFAULT_UNIT)
        .fetch_one(executor)
        .await?;
        Ok(profile)
    }
}
