use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};

use crate::controllers::worker_controller::WorkerController;
use crate::dto::api_response::ApiResponse;
use crate::dto::worker_dto::{CreateWorkerRequest, DeleteWorkerResponse, UpdateWorkerRequest};
use crate::models::worker::Worker;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, IdPath};

pub fn create_worker_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_workers).post(create_worker))
        .route("/:id", patch(update_worker).delete(delete_worker))
}

async fn list_workers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Worker>>>, AppError> {
    let controller = WorkerController::new(state.pool.clone());
    let workers = controller.list().await?;
    Ok(Json(ApiResponse::success(workers)))
}

async fn create_worker(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateWorkerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Worker>>), AppError> {
    let controller = WorkerController::new(state.pool.clone());
    let worker = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(worker))))
}

async fn update_worker(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    AppJson(request): AppJson<UpdateWorkerRequest>,
) -> Result<Json<ApiResponse<Worker>>, AppError> {
    let controller = WorkerController::new(state.pool.clone());
    let worker = controller.update(id, request).await?;
    Ok(Json(ApiResponse::success(worker)))
}

async fn delete_worker(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<ApiResponse<DeleteWorkerResponse>>, AppError> {
    let controller = WorkerController::new(state.pool.clone());
    let response = controller.delete(id).await?;
    Ok(Json(ApiResponse::success(response)))
}
