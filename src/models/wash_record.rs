//! Modelo de WashRecord
//!
//! Una transacción de lavado: desde que el auto entra hasta que se termina
//! o se cancela. Mapea a la tabla `wash_records`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::models::worker::Worker;

/// Tipo de lavado - mapea al ENUM wash_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "wash_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WashType {
    Inner,
    Outer,
    Full,
    Free,
}

impl WashType {
    pub const ALL: [WashType; 4] = [WashType::Inner, WashType::Outer, WashType::Full, WashType::Free];

    /// Precio de lista; en la recepción se puede editar.
    pub fn list_price(self) -> Decimal {
        match self {
            WashType::Inner | WashType::Outer => Decimal::from(90),
            WashType::Full => Decimal::from(170),
            WashType::Free => Decimal::ZERO,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WashType::Inner => "INNER",
            WashType::Outer => "OUTER",
            WashType::Full => "FULL",
            WashType::Free => "FREE",
        }
    }
}

/// Medio de pago - mapea al ENUM payment_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "payment_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Cash,
    Instapay,
}

impl PaymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentType::Cash => "CASH",
            PaymentType::Instapay => "INSTAPAY",
        }
    }
}

/// Estado del lavado - mapea al ENUM wash_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "wash_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WashStatus {
    InProgress,
    Finished,
    Cancelled,
}

impl WashStatus {
    /// FINISHED y CANCELLED no tienen salida.
    pub fn is_terminal(self) -> bool {
        !matches!(self, WashStatus::InProgress)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WashStatus::InProgress => "IN_PROGRESS",
            WashStatus::Finished => "FINISHED",
            WashStatus::Cancelled => "CANCELLED",
        }
    }
}

/// WashRecord principal - mapea exactamente a la tabla wash_records
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WashRecord {
    pub id: Uuid,
    pub plate_number: String,
    pub car_type: Option<String>,
    pub phone_number: Option<String>,
    pub wash_type: WashType,
    pub payment_type: Option<PaymentType>,
    pub amount_paid: Decimal,
    pub tip_amount: Decimal,
    pub payment_received: bool,
    pub instapay_proof: Option<String>,
    pub worker_id: Option<Uuid>,
    pub status: WashStatus,
    pub entry_time: DateTime<Utc>,
    pub finish_time: Option<DateTime<Utc>>,
    pub elapsed_minutes: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registro con su trabajador resuelto, tal como lo devuelve la API.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WashRecordWithWorker {
    #[serde(flatten)]
    pub record: WashRecord,
    pub worker: Option<Worker>,
}

impl WashRecordWithWorker {
    pub fn new(record: WashRecord, worker: Option<Worker>) -> Self {
        Self { record, worker }
    }

    pub fn worker_name(&self) -> Option<&str> {
        self.worker.as_ref().map(|w| w.name.as_str())
    }
}
