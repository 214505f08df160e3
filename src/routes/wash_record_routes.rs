use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};

use crate::controllers::wash_record_controller::WashRecordController;
use crate::dto::api_response::ApiResponse;
use crate::dto::wash_record_dto::{
    CancelWashRecordRequest, CreateWashRecordRequest, FinishWashRecordRequest,
    PaymentStatusRequest, RecordRangeQuery, UpdateWashRecordRequest, UploadProofRequest,
    WashTypePrice,
};
use crate::models::wash_record::WashRecordWithWorker;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppQuery, IdPath, OptionalJson};
use crate::utils::validation::MAX_PROOF_BODY_BYTES;

type RecordResponse = Result<Json<ApiResponse<WashRecordWithWorker>>, AppError>;

pub fn create_wash_record_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route(
            "/:id",
            get(get_record).patch(update_record).delete(delete_record),
        )
        .route("/:id/finish", post(finish_record))
        .route("/:id/cancel", post(cancel_record))
        .route("/:id/payment", patch(set_payment_received))
        .route(
            "/:id/proof",
            post(upload_proof)
                .delete(clear_proof)
                .layer(DefaultBodyLimit::max(MAX_PROOF_BODY_BYTES)),
        )
}

pub fn create_wash_type_router() -> Router<AppState> {
    Router::new().route("/", get(list_wash_types))
}

async fn list_wash_types() -> Json<ApiResponse<Vec<WashTypePrice>>> {
    Json(ApiResponse::success(WashTypePrice::catalog()))
}

async fn list_records(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RecordRangeQuery>,
) -> Result<Json<ApiResponse<Vec<WashRecordWithWorker>>>, AppError> {
    let controller = WashRecordController::new(state.pool.clone());
    let records = controller.list(query).await?;
    Ok(Json(ApiResponse::success(records)))
}

async fn create_record(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateWashRecordRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WashRecordWithWorker>>), AppError> {
    let controller = WashRecordController::new(state.pool.clone());
    let record = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(record))))
}

async fn get_record(State(state): State<AppState>, IdPath(id): IdPath) -> RecordResponse {
    let controller = WashRecordController::new(state.pool.clone());
    let record = controller.get(id).await?;
    Ok(Json(ApiResponse::success(record)))
}

async fn update_record(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    AppJson(request): AppJson<UpdateWashRecordRequest>,
) -> RecordResponse {
    let controller = WashRecordController::new(state.pool.clone());
    let record = controller.update(id, request).await?;
    Ok(Json(ApiResponse::success(record)))
}

async fn delete_record(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = WashRecordController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(ApiResponse::<()>::ok()))
}

async fn finish_record(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    OptionalJson(request): OptionalJson<FinishWashRecordRequest>,
) -> RecordResponse {
    let controller = WashRecordController::new(state.pool.clone());
    let record = controller.finish(id, request, state.notifier.clone()).await?;
    Ok(Json(ApiResponse::success(record)))
}

async fn cancel_record(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    OptionalJson(request): OptionalJson<CancelWashRecordRequest>,
) -> RecordResponse {
    let controller = WashRecordController::new(state.pool.clone());
    let record = controller.cancel(id, request).await?;
    Ok(Json(ApiResponse::success(record)))
}

async fn set_payment_received(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    AppJson(request): AppJson<PaymentStatusRequest>,
) -> RecordResponse {
    let controller = WashRecordController::new(state.pool.clone());
    let record = controller.set_payment_received(id, request).await?;
    Ok(Json(ApiResponse::success(record)))
}

async fn upload_proof(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    AppJson(request): AppJson<UploadProofRequest>,
) -> RecordResponse {
    let controller = WashRecordController::new(state.pool.clone());
    let record = controller.upload_proof(id, request).await?;
    Ok(Json(ApiResponse::success(record)))
}

async fn clear_proof(State(state): State<AppState>, IdPath(id): IdPath) -> RecordResponse {
    let controller = WashRecordController::new(state.pool.clone());
    let record = controller.clear_proof(id).await?;
    Ok(Json(ApiResponse::success(record)))
}
