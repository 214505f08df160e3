use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::worker::{Worker, WorkerRole};
use crate::utils::errors::{map_unique_violation, AppError};

const DUPLICATE_NAME: &str = "Worker with this name already exists";

pub struct WorkerRepository {
    pool: PgPool,
}

impl WorkerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Activos primero, luego por nombre.
    pub async fn list(&self) -> Result<Vec<Worker>, AppError> {
        let workers = sqlx::query_as::<_, Worker>(
            "SELECT * FROM workers ORDER BY is_active DESC, name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(workers)
    }

    /// Todos por nombre; es el orden de las estadísticas.
    pub async fn list_by_name(&self) -> Result<Vec<Worker>, AppError> {
        let workers = sqlx::query_as::<_, Worker>("SELECT * FROM workers ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(workers)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Worker>, AppError> {
        let worker = sqlx::query_as::<_, Worker>("SELECT * FROM workers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(worker)
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Worker>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let workers = sqlx::query_as::<_, Worker>("SELECT * FROM workers WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(workers)
    }

    pub async fn create(&self, name: String, role: WorkerRole) -> Result<Worker, AppError> {
        let now = Utc::now();
        sqlx::query_as::<_, Worker>(
            r#"
            INSERT INTO workers (id, name, role, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, TRUE, $4, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(role)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, AppError::Conflict(DUPLICATE_NAME.to_string())))
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        role: Option<WorkerRole>,
        is_active: Option<bool>,
    ) -> Result<Option<Worker>, AppError> {
        sqlx::query_as::<_, Worker>(
            r#"
            UPDATE workers
            SET name = COALESCE($2, name),
                role = COALESCE($3, role),
                is_active = COALESCE($4, is_active),
                updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(role)
        .bind(is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, AppError::Conflict(DUPLICATE_NAME.to_string())))
    }

    /// Borra el trabajador si no tiene registros; si los tiene, lo desactiva.
    /// La fila queda bloqueada con `FOR UPDATE` hasta el commit, así que un
    /// registro nuevo que lo referencie espera y no rompe la FK a mitad del
    /// borrado. `None` si no existe; si no, `(borrado, referencias)`.
    pub async fn remove(&self, id: Uuid) -> Result<Option<(bool, i64)>, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM workers WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let references: i64 = sqlx::query_scalar(
            r#"
            SELECT (SELECT COUNT(*) FROM wash_records WHERE worker_id = $1)
                 + (SELECT COUNT(*) FROM mechanic_records WHERE worker_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        let deleted = references == 0;
        if deleted {
            sqlx::query("DELETE FROM workers WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        } else {
            sqlx::query("UPDATE workers SET is_active = FALSE, updated_at = $2 WHERE id = $1")
                .bind(id)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(Some((deleted, references)))
    }
}
