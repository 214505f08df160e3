use axum::{routing::post, Router};

use crate::controllers::auth_controller::{login, logout};
use crate::state::AppState;

/// Rutas públicas de autenticación
pub fn create_auth_router() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Rutas de autenticación que exigen sesión
pub fn create_session_router() -> Router<AppState> {
    Router::new().route("/auth/logout", post(logout))
}
