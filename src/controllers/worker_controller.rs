use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::worker_dto::{
    CreateWorkerRequest, DeleteWorkerResponse, UpdateWorkerRequest, WorkerDeletion,
};
use crate::models::worker::Worker;
use crate::repositories::WorkerRepository;
use crate::utils::errors::{not_found_error, AppResult};

pub struct WorkerController {
    repository: WorkerRepository,
}

impl WorkerController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: WorkerRepository::new(pool),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Worker>> {
        self.repository.list().await
    }

    pub async fn create(&self, request: CreateWorkerRequest) -> AppResult<Worker> {
        request.validate()?;
        let worker = self
            .repository
            .create(request.name.trim().to_string(), request.role.unwrap_or_default())
            .await?;
        info!("👷 Worker {} added", worker.name);
        Ok(worker)
    }

    pub async fn update(&self, id: Uuid, request: UpdateWorkerRequest) -> AppResult<Worker> {
        request.validate()?;
        self.repository
            .update(
                id,
                request.name.map(|n| n.trim().to_string()),
                request.role,
                request.is_active,
            )
            .await?
            .ok_or_else(|| not_found_error("Worker", &id.to_string()))
    }

    /// Con registros asociados sólo se desactiva; sin ellos se borra.
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteWorkerResponse> {
        let (deleted, references) = self
            .repository
            .remove(id)
            .await?
            .ok_or_else(|| not_found_error("Worker", &id.to_string()))?;

        let result = if deleted {
            WorkerDeletion::Deleted
        } else {
            WorkerDeletion::Deactivated
        };
        info!("Worker {} removed ({:?}, {} records)", id, result, references);

        Ok(DeleteWorkerResponse { id, result })
    }
}
