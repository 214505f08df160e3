//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! fechas del negocio, placas y extractores HTTP.

pub mod date_range;
pub mod errors;
pub mod extract;
pub mod plate;
pub mod serde_helpers;
pub mod validation;
