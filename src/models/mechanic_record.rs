//! Modelo de MechanicRecord
//!
//! Servicios del taller (cambio de aceite u otros). No tiene estados:
//! se crea, se marca como cobrado y eventualmente se borra.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::models::wash_record::PaymentType;

/// Categoría del servicio - mapea al ENUM mechanic_category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "mechanic_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MechanicCategory {
    OilService,
    OtherService,
}

/// Aceite usado - mapea al ENUM oil_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "oil_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OilType {
    #[sqlx(rename = "SHELL_4L")]
    #[serde(rename = "SHELL_4L")]
    Shell4L,
    #[sqlx(rename = "SHELL_5L")]
    #[serde(rename = "SHELL_5L")]
    Shell5L,
    #[sqlx(rename = "CUSTOMER_OWN")]
    #[serde(rename = "CUSTOMER_OWN")]
    CustomerOwn,
}

/// Alcance del cambio de aceite - mapea al ENUM mechanic_service_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "mechanic_service_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MechanicServiceType {
    OilOnly,
    OilAndFilter,
}

/// MechanicRecord principal - mapea a la tabla mechanic_records
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MechanicRecord {
    pub id: Uuid,
    pub plate_number: String,
    pub car_type: Option<String>,
    pub phone_number: Option<String>,
    pub category: MechanicCategory,
    pub oil_type: Option<OilType>,
    pub oil_price: Decimal,
    pub service_type: Option<MechanicServiceType>,
    pub labor_cost: Decimal,
    pub filter_price: Decimal,
    pub service_name: Option<String>,
    pub service_price: Decimal,
    pub total_amount: Decimal,
    pub payment_type: Option<PaymentType>,
    pub payment_received: bool,
    pub notes: Option<String>,
    pub worker_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
