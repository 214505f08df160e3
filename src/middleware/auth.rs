//! Middleware de sesión
//!
//! Todas las rutas de `/api` salvo el login exigen la cookie `carwash_auth`
//! con un token de sesión vivo. Sin ella se responde 401 con el sobre JSON.

use axum::{
    extract::{Request, State},
    http::{header::COOKIE, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::state::AppState;
use crate::utils::errors::AppError;

pub const SESSION_COOKIE_NAME: &str = "carwash_auth";

/// Token de sesión validado, disponible en las extensiones de la request
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub token: String,
}

pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let tokens = extract_cookies(request.headers(), SESSION_COOKIE_NAME);

    for token in tokens {
        if state.is_session_valid(&token).await {
            request.extensions_mut().insert(SessionContext { token });
            return next.run(request).await;
        }
    }

    debug!("Rejected {} {}: no live session", request.method(), request.uri().path());
    AppError::Unauthorized("Unauthorized".to_string()).into_response()
}

/// Valores de todas las cookies con ese nombre (puede haber varias)
pub fn extract_cookies(headers: &HeaderMap, name: &str) -> Vec<String> {
    headers
        .get_all(COOKIE)
        .into_iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let mut split = pair.trim().splitn(2, '=');
            let key = split.next()?.trim();
            let value = split.next()?.trim();
            if key == name && !value.is_empty() {
                Some(value.to_owned())
            } else {
                None
            }
        })
        .collect()
}

/// `Set-Cookie` de una sesión nueva
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE_NAME, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` que borra la sesión en el navegador
pub fn clear_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE_NAME
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_cookies_picks_named_values() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; carwash_auth=abc123; other=1"),
        );
        headers.append(COOKIE, HeaderValue::from_static("carwash_auth=def456"));
        assert_eq!(
            extract_cookies(&headers, SESSION_COOKIE_NAME),
            vec!["abc123".to_string(), "def456".to_string()]
        );
    }

    #[test]
    fn test_empty_cookie_value_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("carwash_auth="));
        assert!(extract_cookies(&headers, SESSION_COOKIE_NAME).is_empty());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", 604800, true);
        assert_eq!(
            cookie,
            "carwash_auth=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=604800; Secure"
        );
        assert!(!session_cookie("tok", 60, false).contains("Secure"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
