//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean exactamente
//! al schema PostgreSQL de `migrations/`.

pub mod mechanic_record;
pub mod wash_record;
pub mod worker;
