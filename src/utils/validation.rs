//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos. Se usan tanto como `custom` de `validator`
//! como directamente desde los controladores.

use base64::Engine;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    static ref DATA_URL_RE: Regex =
        Regex::new(r"^data:image/(png|jpe?g|webp|gif|heic);base64,").unwrap();
}

/// Tamaño máximo aceptado para la captura de InstaPay (ya decodificada).
pub const MAX_PROOF_BYTES: usize = 5 * 1024 * 1024;

/// Límite del cuerpo en la subida de la captura: la imagen máxima en
/// base64 más el prefijo `data:` y el JSON que la envuelve.
pub const MAX_PROOF_BODY_BYTES: usize = (MAX_PROOF_BYTES + 2) / 3 * 4 + 64 * 1024;

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.message = Some("must not be empty".into());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.message = Some(format!("must be between {} and {}", min, max).into());
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (solo dígitos, 7 a 15)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_ascii_digit()).count();
    if clean_phone < 7 || clean_phone > 15 {
        let mut error = ValidationError::new("phone");
        error.message = Some("must contain 7 to 15 digits".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.message = Some("must be 0 or positive".into());
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Variante por referencia para `#[validate(custom = ...)]` sobre montos.
pub fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)
}

/// Validar una imagen en base64, con o sin prefijo `data:image/...;base64,`.
pub fn validate_base64_image(value: &str) -> Result<(), ValidationError> {
    let payload = match DATA_URL_RE.find(value) {
        Some(m) => &value[m.end()..],
        None if value.starts_with("data:") => {
            let mut error = ValidationError::new("image_type");
            error.message = Some("only image data URLs are accepted".into());
            return Err(error);
        }
        None => value,
    };

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|_| {
            let mut error = ValidationError::new("base64");
            error.message = Some("is not valid base64".into());
            error
        })?;

    if decoded.is_empty() || decoded.len() > MAX_PROOF_BYTES {
        let mut error = ValidationError::new("image_size");
        error.message = Some("image must be between 1 byte and 5 MB".into());
        error.add_param("actual".into(), &decoded.len());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2024/01/15").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("ABC").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(dec(350), dec(350), dec(500)).is_ok());
        assert!(validate_range(dec(500), dec(350), dec(500)).is_ok());
        assert!(validate_range(dec(349), dec(350), dec(500)).is_err());
        assert!(validate_range(dec(501), dec(350), dec(500)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("01012345678").is_ok());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn test_validate_money() {
        assert!(validate_money(&dec(0)).is_ok());
        assert!(validate_money(&dec(90)).is_ok());
        assert!(validate_money(&dec(-1)).is_err());
    }

    #[test]
    fn test_validate_base64_image() {
        assert!(validate_base64_image("data:image/png;base64,iVBORw0KGgo=").is_ok());
        assert!(validate_base64_image("iVBORw0KGgo=").is_ok());
        assert!(validate_base64_image("data:text/html;base64,PGI+").is_err());
        assert!(validate_base64_image("not base64 at all!").is_err());
        assert!(validate_base64_image("").is_err());
    }

    #[test]
    fn test_largest_proof_fits_body_limit() {
        let image = vec![0u8; MAX_PROOF_BYTES];
        let encoded = base64::engine::general_purpose::STANDARD.encode(&image);
        let body = format!(r#"{{"instapayProof":"data:image/png;base64,{}"}}"#, encoded);
        assert!(body.len() <= MAX_PROOF_BODY_BYTES);
        assert!(body.len() > 2 * 1024 * 1024);
    }
}
