use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};

use crate::controllers::mechanic_controller::MechanicController;
use crate::dto::api_response::ApiResponse;
use crate::dto::mechanic_dto::{CreateMechanicRecordRequest, UpdateMechanicRecordRequest};
use crate::dto::wash_record_dto::{PaymentStatusRequest, RecordRangeQuery};
use crate::models::mechanic_record::MechanicRecord;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppQuery, IdPath};

type MechanicResponse = Result<Json<ApiResponse<MechanicRecord>>, AppError>;

pub fn create_mechanic_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route(
            "/:id",
            get(get_record).patch(update_record).delete(delete_record),
        )
        .route("/:id/payment", patch(set_payment_received))
}

async fn list_records(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RecordRangeQuery>,
) -> Result<Json<ApiResponse<Vec<MechanicRecord>>>, AppError> {
    let controller = MechanicController::new(state.pool.clone());
    let records = controller.list(query).await?;
    Ok(Json(ApiResponse::success(records)))
}

async fn create_record(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateMechanicRecordRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MechanicRecord>>), AppError> {
    let controller = MechanicController::new(state.pool.clone());
    let record = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(record))))
}

async fn get_record(State(state): State<AppState>, IdPath(id): IdPath) -> MechanicResponse {
    let controller = MechanicController::new(state.pool.clone());
    let record = controller.get(id).await?;
    Ok(Json(ApiResponse::success(record)))
}

async fn update_record(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    AppJson(request): AppJson<UpdateMechanicRecordRequest>,
) -> MechanicResponse {
    let controller = MechanicController::new(state.pool.clone());
    let record = controller.update(id, request).await?;
    Ok(Json(ApiResponse::success(record)))
}

async fn delete_record(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = MechanicController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(ApiResponse::<()>::ok()))
}

async fn set_payment_received(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    AppJson(request): AppJson<PaymentStatusRequest>,
) -> MechanicResponse {
    let controller = MechanicController::new(state.pool.clone());
    let record = controller.set_payment_received(id, request).await?;
    Ok(Json(ApiResponse::success(record)))
}
