//! Estadísticas, reportes, exportación y búsqueda de clientes

use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::controllers::customer_controller::CustomerController;
use crate::controllers::report_controller::{ExportFile, ReportController};
use crate::controllers::worker_stats_controller::WorkerStatsController;
use crate::dto::api_response::ApiResponse;
use crate::dto::stats_dto::{
    CustomerSearchQuery, DailyExportQuery, MonthlyExportQuery, ReportSummaryResponse,
    WorkerStatsQuery, WorkerStatsResponse,
};
use crate::dto::wash_record_dto::RecordRangeQuery;
use crate::services::customer_lookup::CustomerProfile;
use crate::services::excel_export::XLSX_CONTENT_TYPE;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppQuery;

pub fn create_worker_stats_router() -> Router<AppState> {
    Router::new().route("/", get(worker_stats))
}

pub fn create_export_router() -> Router<AppState> {
    Router::new()
        .route("/daily", get(export_daily))
        .route("/monthly", get(export_monthly))
}

pub fn create_report_router() -> Router<AppState> {
    Router::new().route("/summary", get(report_summary))
}

pub fn create_customer_router() -> Router<AppState> {
    Router::new().route("/search", get(search_customer))
}

async fn worker_stats(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<WorkerStatsQuery>,
) -> Result<Json<ApiResponse<WorkerStatsResponse>>, AppError> {
    let controller = WorkerStatsController::new(state.pool.clone());
    let stats = controller.stats(query).await?;
    Ok(Json(ApiResponse::success(stats)))
}

async fn export_daily(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DailyExportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let controller = ReportController::new(state.pool.clone());
    let file = controller.export_daily(query).await?;
    Ok(xlsx_download(file))
}

async fn export_monthly(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MonthlyExportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let controller = ReportController::new(state.pool.clone());
    let file = controller.export_monthly(query).await?;
    Ok(xlsx_download(file))
}

fn xlsx_download(file: ExportFile) -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.bytes,
    )
}

async fn report_summary(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RecordRangeQuery>,
) -> Result<Json<ApiResponse<ReportSummaryResponse>>, AppError> {
    let controller = ReportController::new(state.pool.clone());
    let summary = controller.summary(query).await?;
    Ok(Json(ApiResponse::success(summary)))
}

/// `data` es null si la consulta es muy corta o no hay coincidencias.
async fn search_customer(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CustomerSearchQuery>,
) -> Result<Json<ApiResponse<Option<CustomerProfile>>>, AppError> {
    let controller = CustomerController::new(state.pool.clone());
    let profile = controller.search(query).await?;
    Ok(Json(ApiResponse::success(profile)))
}
