//! Extractores de Axum con errores en el sobre JSON
//!
//! Los extractores de Axum rechazan con texto plano; estos envoltorios
//! convierten cada rechazo en `AppError` para que toda respuesta salga
//! como `{success, error}`.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Cuerpo JSON obligatorio.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

/// Cuerpo JSON opcional: un cuerpo vacío equivale a `T::default()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        parse_optional_body(&bytes).map(OptionalJson)
    }
}

pub fn parse_optional_body<T>(bytes: &[u8]) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))
}

/// Query string tipada.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(AppQuery(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

/// Identificador `/:id` ya convertido a UUID.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Uuid::parse_str(&raw)
            .map(IdPath)
            .map_err(|_| AppError::BadRequest(format!("Invalid id '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Body {
        amount_paid: Option<i64>,
    }

    #[test]
    fn empty_body_is_default() {
        let body: Body = parse_optional_body(b"").unwrap();
        assert_eq!(body, Body::default());
        let body: Body = parse_optional_body(b"  \n").unwrap();
        assert_eq!(body, Body::default());
    }

    #[test]
    fn present_body_is_parsed() {
        let body: Body = parse_optional_body(br#"{"amountPaid": 90}"#).unwrap();
        assert_eq!(body.amount_paid, Some(90));
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let err = parse_optional_body::<Body>(b"{not json").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
