//! Backend del punto de venta del lavadero y taller
//!
//! API JSON bajo `/api`: registros de lavado, trabajadores, taller
//! mecánico, estadísticas, exportación a Excel y búsqueda de clientes.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::dto::api_response::ApiResponse;
use crate::middleware::auth::require_session;
use crate::middleware::cors::cors_layer;
use crate::routes::{auth_routes, mechanic_routes, report_routes, wash_record_routes, worker_routes};
use crate::state::AppState;

/// Router completo de la aplicación
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/wash-records", wash_record_routes::create_wash_record_router())
        .nest("/wash-types", wash_record_routes::create_wash_type_router())
        .nest("/workers", worker_routes::create_worker_router())
        .nest("/worker-stats", report_routes::create_worker_stats_router())
        .nest("/mechanic", mechanic_routes::create_mechanic_router())
        .nest("/export", report_routes::create_export_router())
        .nest("/reports", report_routes::create_report_router())
        .nest("/customers", report_routes::create_customer_router())
        .merge(auth_routes::create_session_router())
        .route_layer(from_fn_with_state(state.clone(), require_session));

    let api = Router::new()
        .merge(auth_routes::create_auth_router())
        .merge(protected);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(&state.config)),
        )
        .with_state(state)
}

async fn health() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
