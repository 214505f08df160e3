use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::mechanic_dto::{CreateMechanicRecordRequest, UpdateMechanicRecordRequest};
use crate::dto::wash_record_dto::{PaymentStatusRequest, RecordRangeQuery};
use crate::models::mechanic_record::MechanicRecord;
use crate::repositories::{MechanicRepository, WorkerRepository};
use crate::services::mechanic_pricing::{apply_update, prepare_create};
use crate::utils::date_range::resolve_range;
use crate::utils::errors::{not_found_error, AppResult};

pub struct MechanicController {
    repository: MechanicRepository,
    workers: WorkerRepository,
}

impl MechanicController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: MechanicRepository::new(pool.clone()),
            workers: WorkerRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateMechanicRecordRequest) -> AppResult<MechanicRecord> {
        request.validate()?;
        let new = prepare_create(request)?;
        if let Some(worker_id) = new.worker_id {
            self.ensure_worker_exists(worker_id).await?;
        }

        let record = self.repository.create(new).await?;
        info!("🔧 Mechanic service for {} recorded: {} EGP", record.plate_number, record.total_amount);
        Ok(record)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<MechanicRecord> {
        self.load(id).await
    }

    pub async fn list(&self, query: RecordRangeQuery) -> AppResult<Vec<MechanicRecord>> {
        let range = resolve_range(query.date.as_deref(), query.month.as_deref(), Utc::now())?;
        self.repository.find_in_range(range).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateMechanicRecordRequest,
    ) -> AppResult<MechanicRecord> {
        request.validate()?;
        if let Some(Some(worker_id)) = request.worker_id {
            self.ensure_worker_exists(worker_id).await?;
        }
        let current = self.load(id).await?;
        let updated = apply_update(&current, request)?;
        self.repository
            .update(&updated)
            .await?
            .ok_or_else(|| not_found_error("Mechanic record", &id.to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Mechanic record", &id.to_string()));
        }
        Ok(())
    }

    pub async fn set_payment_received(
        &self,
        id: Uuid,
        request: PaymentStatusRequest,
    ) -> AppResult<MechanicRecord> {
        self.repository
            .set_payment_received(id, request.payment_received)
            .await?
            .ok_or_else(|| not_found_error("Mechanic record", &id.to_string()))
    }

    async fn load(&self, id: Uuid) -> AppResult<MechanicRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Mechanic record", &id.to_string()))
    }

    async fn ensure_worker_exists(&self, worker_id: Uuid) -> AppResult<()> {
        self.workers
            .find_by_id(worker_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| not_found_error("Worker", &worker_id.to_string()))
    }
}
