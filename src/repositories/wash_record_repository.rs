//! Acceso a la tabla `wash_records`
//!
//! Las transiciones de estado se escriben con `WHERE status = ...`: si otra
//! petición cambió el registro entre la lectura y la escritura, la consulta
//! no devuelve filas y el llamador decide entre 404 y conflicto.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::wash_record::{WashRecord, WashStatus};
use crate::services::customer_lookup::PlateQuery;
use crate::services::wash_lifecycle::NewWashRecord;
use crate::utils::date_range::DateRange;
use crate::utils::errors::AppError;

pub struct WashRecordRepository {
    pool: PgPool,
}

impl WashRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewWashRecord) -> Result<WashRecord, AppError> {
        let now = Utc::now();
        let record = sqlx::query_as::<_, WashRecord>(
            r#"
            INSERT INTO wash_records (
                id, plate_number, car_type, phone_number, wash_type, payment_type,
                amount_paid, tip_amount, payment_received, worker_id, status,
                entry_time, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, $9, 'IN_PROGRESS', $10, $11, $12, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.plate_number)
        .bind(new.car_type)
        .bind(new.phone_number)
        .bind(new.wash_type)
        .bind(new.payment_type)
        .bind(new.amount_paid)
        .bind(new.tip_amount)
        .bind(new.worker_id)
        .bind(new.entry_time)
        .bind(new.notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<WashRecord>, AppError> {
        let record = sqlx::query_as::<_, WashRecord>("SELECT * FROM wash_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Registros con `entry_time` dentro del rango (extremos incluidos).
    pub async fn find_in_range(
        &self,
        range: DateRange,
        newest_first: bool,
    ) -> Result<Vec<WashRecord>, AppError> {
        let sql = if newest_first {
            "SELECT * FROM wash_records WHERE entry_time >= $1 AND entry_time <= $2 ORDER BY entry_time DESC"
        } else {
            "SELECT * FROM wash_records WHERE entry_time >= $1 AND entry_time <= $2 ORDER BY entry_time ASC"
        };
        let records = sqlx::query_as::<_, WashRecord>(sql)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Guarda un FINISHED o CANCELLED sólo si el registro sigue en curso.
    /// `None` significa que no existe o que ya no está IN_PROGRESS.
    pub async fn save_transition(&self, record: &WashRecord) -> Result<Option<WashRecord>, AppError> {
        let saved = sqlx::query_as::<_, WashRecord>(
            r#"
            UPDATE wash_records
            SET status = $2,
                finish_time = $3,
                elapsed_minutes = $4,
                payment_type = $5,
                amount_paid = $6,
                tip_amount = $7,
                payment_received = $8,
                instapay_proof = $9,
                notes = $10,
                updated_at = $11
            WHERE id = $1 AND status = 'IN_PROGRESS'
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(record.status)
        .bind(record.finish_time)
        .bind(record.elapsed_minutes)
        .bind(record.payment_type)
        .bind(record.amount_paid)
        .bind(record.tip_amount)
        .bind(record.payment_received)
        .bind(&record.instapay_proof)
        .bind(&record.notes)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(saved)
    }

    /// Escribe todos los campos editables si el estado sigue siendo `expected`.
    pub async fn update(
        &self,
        record: &WashRecord,
        expected: WashStatus,
    ) -> Result<Option<WashRecord>, AppError> {
        let saved = sqlx::query_as::<_, WashRecord>(
            r#"
            UPDATE wash_records
            SET plate_number = $3,
                car_type = $4,
                phone_number = $5,
                wash_type = $6,
                payment_type = $7,
                amount_paid = $8,
                tip_amount = $9,
                instapay_proof = $10,
                worker_id = $11,
                entry_time = $12,
                finish_time = $13,
                elapsed_minutes = $14,
                notes = $15,
                updated_at = $16
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(expected)
        .bind(&record.plate_number)
        .bind(&record.car_type)
        .bind(&record.phone_number)
        .bind(record.wash_type)
        .bind(record.payment_type)
        .bind(record.amount_paid)
        .bind(record.tip_amount)
        .bind(&record.instapay_proof)
        .bind(record.worker_id)
        .bind(record.entry_time)
        .bind(record.finish_time)
        .bind(record.elapsed_minutes)
        .bind(&record.notes)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM wash_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_payment_received(
        &self,
        id: Uuid,
        payment_received: bool,
    ) -> Result<Option<WashRecord>, AppError> {
        let record = sqlx::query_as::<_, WashRecord>(
            r#"
            UPDATE wash_records
            SET payment_received = $2, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payment_received)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Guarda o borra la captura de InstaPay.
    pub async fn set_proof(
        &self,
        id: Uuid,
        proof: Option<String>,
    ) -> Result<Option<WashRecord>, AppError> {
        let record = sqlx::query_as::<_, WashRecord>(
            r#"
            UPDATE wash_records
            SET instapay_proof = $2, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(proof)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Visitas cuya placa contiene la consulta en números occidentales o arábigos.
    pub async fn search_by_plate(
        &self,
        query: &PlateQuery,
        limit: i64,
    ) -> Result<Vec<WashRecord>, AppError> {
        let records = sqlx::query_as::<_, WashRecord>(
            r#"
            SELECT * FROM wash_records
            WHERE strpos(upper(plate_number), $1) > 0
               OR strpos(upper(plate_number), $2) > 0
            ORDER BY entry_time DESC
            LIMIT $3
            "#,
        )
        .bind(&query.western)
        .bind(&query.arabic)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
