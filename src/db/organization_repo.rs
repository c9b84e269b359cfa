// src/db/organization_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::organization::{Department, Unit},
};

// Hierarquia Departamento (coordenador) -> Setor (gerente)
#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

fn map_write_error(e: sqlx::Error, name: &str, department_id: Option<i64>) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(name.to_string());
        }
        if db_err.is_foreign_key_violation() {
            // Nomes padrão do Postgres: units_department_id_fkey / *_responsible_id_fkey
            return match (db_err.constraint(), department_id) {
                (Some("units_department_id_fkey"), Some(id)) => {
                    AppError::ResourceNotFound(format!("Departamento {}", id))
                }
                _ => AppError::UserNotFound,
            };
        }
    }
    e.into()
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Setores em que o usuário é o gerente responsável
    pub async fn unit_names_managed_by(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT name FROM units WHERE responsible_id = $1 ORDER BY name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    // 2. Todos os setores dos departamentos que o usuário coordena
    pub async fn unit_names_coordinated_by(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT u.name
            FROM units u
            JOIN departments d ON d.id = u.department_id
            WHERE d.responsible_id = $1
            ORDER BY u.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    // 3. Lista para o autocomplete do formulário
    pub async fn list_unit_names(&self) -> Result<Vec<String>, AppError> {
        let names = sqlx::query_scalar::<_, String>("SELECT name FROM units ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        let departments = sqlx::query_as::<_, Department>(
            "SELECT id, name, responsible_id FROM departments ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(departments)
    }

    pub async fn create_department(
        &self,
        name: &str,
        responsible_id: Option<Uuid>,
    ) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (name, responsible_id)
            VALUES ($1, $2)
            RETURNING id, name, responsible_id
            "#,
        )
        .bind(name)
        .bind(responsible_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, name, None))
    }

    pub async fn create_unit(
        &self,
        name: &str,
        department_id: i64,
        responsible_id: Option<Uuid>,
    ) -> Result<Unit, AppError> {
        sqlx::query_as::<_, Unit>(
            r#"
            INSERT INTO units (name, department_id, responsible_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, department_id, responsible_id
            "#,
        )
        .bind(name)
        .bind(department_id)
        .bind(responsible_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, name, Some(department_id)))
    }
}
