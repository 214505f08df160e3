//! Controlador de registros de lavado
//!
//! Orquesta reglas puras (`wash_lifecycle`) y escrituras condicionales
//! (`WashRecordRepository`). Cada respuesta lleva el trabajador resuelto.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::wash_record_dto::{
    CancelWashRecordRequest, CreateWashRecordRequest, FinishWashRecordRequest,
    PaymentStatusRequest, RecordRangeQuery, UpdateWashRecordRequest, UploadProofRequest,
};
use crate::models::wash_record::{WashRecord, WashRecordWithWorker, WashStatus};
use crate::repositories::{WashRecordRepository, WorkerRepository};
use crate::services::notification_service::{
    spawn_finish_notification, FinishNotice, FinishNotifier,
};
use crate::services::wash_lifecycle::{
    apply_cancel, apply_finish, apply_update, ensure_proof_allowed, prepare_create,
};
use crate::utils::date_range::{resolve_range, DateRange};
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct WashRecordController {
    repository: WashRecordRepository,
    workers: WorkerRepository,
}

impl WashRecordController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: WashRecordRepository::new(pool.clone()),
            workers: WorkerRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreateWashRecordRequest) -> AppResult<WashRecordWithWorker> {
        request.validate()?;
        let new = prepare_create(request, Utc::now())?;
        if let Some(worker_id) = new.worker_id {
            self.ensure_worker_exists(worker_id).await?;
        }

        let record = self.repository.create(new).await?;
        info!("🚗 Car {} checked in ({})", record.plate_number, record.wash_type.as_str());
        self.with_worker(record).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<WashRecordWithWorker> {
        let record = self.load(id).await?;
        self.with_worker(record).await
    }

    pub async fn list(&self, query: RecordRangeQuery) -> AppResult<Vec<WashRecordWithWorker>> {
        let range = resolve_range(query.date.as_deref(), query.month.as_deref(), Utc::now())?;
        let records = self.repository.find_in_range(range, true).await?;
        self.with_workers(records).await
    }

    /// Registros del rango en orden de llegada, para reportes y exportación.
    pub async fn list_chronological(
        &self,
        range: DateRange,
    ) -> AppResult<Vec<WashRecordWithWorker>> {
        let records = self.repository.find_in_range(range, false).await?;
        self.with_workers(records).await
    }

    pub async fn finish(
        &self,
        id: Uuid,
        request: FinishWashRecordRequest,
        notifier: Arc<dyn FinishNotifier>,
    ) -> AppResult<WashRecordWithWorker> {
        request.validate()?;
        let current = self.load(id).await?;
        let finished = apply_finish(&current, request, Utc::now())?;

        let saved = match self.repository.save_transition(&finished).await? {
            Some(saved) => saved,
            None => return Err(self.lost_transition(id).await),
        };
        info!(
            "✅ Car {} finished in {} min",
            saved.plate_number,
            saved.elapsed_minutes.unwrap_or_default()
        );

        if let Some(phone) = saved.phone_number.clone() {
            spawn_finish_notification(
                notifier,
                FinishNotice {
                    record_id: saved.id,
                    plate_number: saved.plate_number.clone(),
                    phone_number: phone,
                },
            );
        }
        self.with_worker(saved).await
    }

    pub async fn cancel(
        &self,
        id: Uuid,
        request: CancelWashRecordRequest,
    ) -> AppResult<WashRecordWithWorker> {
        request.validate()?;
        let current = self.load(id).await?;
        let cancelled = apply_cancel(&current, request, Utc::now())?;

        let saved = match self.repository.save_transition(&cancelled).await? {
            Some(saved) => saved,
            None => return Err(self.lost_transition(id).await),
        };
        info!("Car {} cancelled, collected {}", saved.plate_number, saved.amount_paid);
        self.with_worker(saved).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateWashRecordRequest,
    ) -> AppResult<WashRecordWithWorker> {
        request.validate()?;
        if let Some(Some(worker_id)) = request.worker_id {
            self.ensure_worker_exists(worker_id).await?;
        }

        let current = self.load(id).await?;
        let updated = apply_update(&current, request)?;
        match self.repository.update(&updated, current.status).await? {
            Some(saved) => self.with_worker(saved).await,
            None => {
                self.load(id).await?;
                Err(AppError::Conflict(
                    "Record was modified by another request, reload and try again".to_string(),
                ))
            }
        }
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Wash record", &id.to_string()));
        }
        info!("🗑️ Wash record {} deleted", id);
        Ok(())
    }

    pub async fn set_payment_received(
        &self,
        id: Uuid,
        request: PaymentStatusRequest,
    ) -> AppResult<WashRecordWithWorker> {
        let record = self
            .repository
            .set_payment_received(id, request.payment_received)
            .await?
            .ok_or_else(|| not_found_error("Wash record", &id.to_string()))?;
        self.with_worker(record).await
    }

    pub async fn upload_proof(
        &self,
        id: Uuid,
        request: UploadProofRequest,
    ) -> AppResult<WashRecordWithWorker> {
        request.validate()?;
        let current = self.load(id).await?;
        ensure_proof_allowed(&current)?;

        let record = self
            .repository
            .set_proof(id, Some(request.instapay_proof.trim().to_string()))
            .await?
            .ok_or_else(|| not_found_error("Wash record", &id.to_string()))?;
        self.with_worker(record).await
    }

    pub async fn clear_proof(&self, id: Uuid) -> AppResult<WashRecordWithWorker> {
        let record = self
            .repository
            .set_proof(id, None)
            .await?
            .ok_or_else(|| not_found_error("Wash record", &id.to_string()))?;
        self.with_worker(record).await
    }

    async fn load(&self, id: Uuid) -> AppResult<WashRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Wash record", &id.to_string()))
    }

    async fn ensure_worker_exists(&self, worker_id: Uuid) -> AppResult<()> {
        self.workers
            .find_by_id(worker_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| not_found_error("Worker", &worker_id.to_string()))
    }

    /// La escritura condicional no encontró el registro en curso: o se
    /// borró, o otra petición ya lo terminó o canceló.
    async fn lost_transition(&self, id: Uuid) -> AppError {
        match self.repository.find_by_id(id).await {
            Ok(Some(record)) => match record.status {
                WashStatus::Finished => AppError::Conflict("Record is already finished".into()),
                WashStatus::Cancelled => AppError::Conflict("Record is already cancelled".into()),
                WashStatus::InProgress => AppError::Conflict(
                    "Record was modified by another request, reload and try again".into(),
                ),
            },
            Ok(None) => not_found_error("Wash record", &id.to_string()),
            Err(e) => e,
        }
    }

    async fn with_worker(&self, record: WashRecord) -> AppResult<WashRecordWithWorker> {
        let worker = match record.worker_id {
            Some(worker_id) => self.workers.find_by_id(worker_id).await?,
            None => None,
        };
        Ok(WashRecordWithWorker::new(record, worker))
    }

    async fn with_workers(&self, records: Vec<WashRecord>) -> AppResult<Vec<WashRecordWithWorker>> {
        let mut ids: Vec<Uuid> = records.iter().filter_map(|r| r.worker_id).collect();
        ids.sort();
        ids.dedup();

        let workers: HashMap<Uuid, _> = self
            .workers
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|w| (w.id, w))
            .collect();

        Ok(records
            .into_iter()
            .map(|record| {
                let worker = record.worker_id.and_then(|id| workers.get(&id).cloned());
                WashRecordWithWorker::new(record, worker)
            })
            .collect())
    }
}
