//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación. Salvo el
//! notificador, son funciones puras sobre modelos ya cargados.

pub mod customer_lookup;
pub mod excel_export;
pub mod mechanic_pricing;
pub mod notification_service;
pub mod wash_lifecycle;
pub mod worker_stats;
