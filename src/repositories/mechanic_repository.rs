use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::mechanic_record::MechanicRecord;
use crate::services::mechanic_pricing::NewMechanicRecord;
use crate::utils::date_range::DateRange;
use crate::utils::errors::AppError;

pub struct MechanicRepository {
    pool: PgPool,
}

impl MechanicRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewMechanicRecord) -> Result<MechanicRecord, AppError> {
        let now = Utc::now();
        let price = new.price;
        let record = sqlx::query_as::<_, MechanicRecord>(
            r#"
            INSERT INTO mechanic_records (
                id, plate_number, car_type, phone_number, category,
                oil_type, oil_price, service_type, labor_cost, filter_price,
                service_name, service_price, total_amount,
                payment_type, payment_received, notes, worker_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $18)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.plate_number)
        .bind(new.car_type)
        .bind(new.phone_number)
        .bind(new.category)
        .bind(price.oil_type)
        .bind(price.oil_price)
        .bind(price.service_type)
        .bind(price.labor_cost)
        .bind(price.filter_price)
        .bind(price.service_name)
        .bind(price.service_price)
        .bind(price.total_amount)
        .bind(new.payment_type)
        .bind(new.payment_received)
        .bind(new.notes)
        .bind(new.worker_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MechanicRecord>, AppError> {
        let record =
            sqlx::query_as::<_, MechanicRecord>("SELECT * FROM mechanic_records WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(record)
    }

    /// Servicios creados dentro del rango, los más nuevos primero.
    pub async fn find_in_range(&self, range: DateRange) -> Result<Vec<MechanicRecord>, AppError> {
        let records = sqlx::query_as::<_, MechanicRecord>(
            r#"
            SELECT * FROM mechanic_records
            WHERE created_at >= $1 AND created_at <= $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Reescribe los campos editables; los precios no se tocan.
    pub async fn update(&self, record: &MechanicRecord) -> Result<Option<MechanicRecord>, AppError> {
        let saved = sqlx::query_as::<_, MechanicRecord>(
            r#"
            UPDATE mechanic_records
            SET plate_number = $2,
                car_type = $3,
                phone_number = $4,
                payment_type = $5,
                payment_received = $6,
                notes = $7,
                worker_id = $8,
                updated_at = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(&record.plate_number)
        .bind(&record.car_type)
        .bind(&record.phone_number)
        .bind(record.payment_type)
        .bind(record.payment_received)
        .bind(&record.notes)
        .bind(record.worker_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM mechanic_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_payment_received(
        &self,
        id: Uuid,
        payment_received: bool,
    ) -> Result<Option<MechanicRecord>, AppError> {
        let record = sqlx::query_as::<_, MechanicRecord>(
            r#"
            UPDATE mechanic_records
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
}
