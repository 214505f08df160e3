//! Login con la contraseña compartida del local
//!
//! Hay una sola contraseña (`ADMIN_PASSWORD`). Un login correcto abre una
//! sesión en memoria y la devuelve como cookie HttpOnly.

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
    Extension, Json,
};
use tracing::{info, warn};

use crate::dto::api_response::ApiResponse;
use crate::dto::auth_dto::LoginRequest;
use crate::middleware::auth::{clear_session_cookie, session_cookie, SessionContext};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::extract::AppJson;

/// Endpoint de login
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let password = payload.password.unwrap_or_default();
    if password.is_empty() {
        return Err(AppError::BadRequest("Password is required".to_string()));
    }

    let Some(expected) = state.config.admin_password.as_deref() else {
        warn!("Login attempt while ADMIN_PASSWORD is not configured");
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    };
    if !password_matches(&password, expected) {
        warn!("Login rejected: wrong password");
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let session = state.create_session().await;
    let cookie = session_cookie(
        &session.token,
        state.config.session_ttl_hours * 3600,
        state.config.is_production(),
    );
    info!("🔐 Session opened, expires at {}", session.expires_at);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(ApiResponse::<()>::ok()),
    ))
}

/// Endpoint de logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> impl IntoResponse {
    state.revoke_session(&session.token).await;
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Json(ApiResponse::<()>::ok()),
    )
}

/// Comparación sin cortocircuito en el primer byte distinto.
fn password_matches(given: &str, expected: &str) -> bool {
    let (a, b) = (given.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_matches() {
        assert!(password_matches("s3cret", "s3cret"));
        assert!(!password_matches("s3cret", "s3cre7"));
        assert!(!password_matches("s3cret", "s3cret!"));
        assert!(!password_matches("", "s3cret"));
    }
}
