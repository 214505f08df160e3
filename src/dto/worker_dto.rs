//! DTOs de trabajadores

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::worker::WorkerRole;

// Request para crear un trabajador
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkerRequest {
    #[validate(
        custom = "crate::utils::validation::validate_not_empty",
        length(max = 100)
    )]
    pub name: String,

    #[serde(default)]
    pub role: Option<WorkerRole>,
}

// Request para actualizar un trabajador; `isActive: true` lo reactiva
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkerRequest {
    #[validate(
        custom = "crate::utils::validation::validate_not_empty",
        length(max = 100)
    )]
    pub name: Option<String>,

    pub role: Option<WorkerRole>,

    pub is_active: Option<bool>,
}

/// Cómo terminó un borrado de trabajador.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkerDeletion {
    /// Tenía registros: sólo se desactivó.
    Deactivated,
    /// No tenía registros: se borró.
    Deleted,
}

// Response del borrado
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteWorkerResponse {
    pub id: Uuid,
    pub result: WorkerDeletion,
}
