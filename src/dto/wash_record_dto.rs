//! DTOs de registros de lavado

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::wash_record::{PaymentType, WashType};
use crate::utils::serde_helpers::{double_option, empty_string_as_none};

// Request para registrar la entrada de un auto
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWashRecordRequest {
    #[validate(
        custom = "crate::utils::validation::validate_not_empty",
        length(max = 30)
    )]
    pub plate_number: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 100))]
    pub car_type: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(custom = "crate::utils::validation::validate_phone")]
    pub phone_number: Option<String>,

    pub wash_type: WashType,

    #[serde(default)]
    pub payment_type: Option<PaymentType>,

    #[validate(custom = "crate::utils::validation::validate_money")]
    pub amount_paid: Option<Decimal>,

    #[validate(custom = "crate::utils::validation::validate_money")]
    pub tip_amount: Option<Decimal>,

    #[serde(default)]
    pub worker_id: Option<Uuid>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

// Request para terminar un lavado; el cuerpo puede venir vacío
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FinishWashRecordRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub payment_type: Option<Option<PaymentType>>,

    #[validate(custom = "crate::utils::validation::validate_money")]
    pub amount_paid: Option<Decimal>,

    #[validate(custom = "crate::utils::validation::validate_money")]
    pub tip_amount: Option<Decimal>,
}

// Request para cancelar ("se fue sin terminar")
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelWashRecordRequest {
    #[validate(custom = "crate::utils::validation::validate_money")]
    pub amount_paid: Option<Decimal>,

    #[serde(default)]
    pub payment_type: Option<PaymentType>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

// Request de edición libre. `Some(None)` borra el campo.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWashRecordRequest {
    #[validate(
        custom = "crate::utils::validation::validate_not_empty",
        length(max = 30)
    )]
    pub plate_number: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub car_type: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub phone_number: Option<Option<String>>,

    pub wash_type: Option<WashType>,

    #[serde(default, deserialize_with = "double_option")]
    pub payment_type: Option<Option<PaymentType>>,

    #[validate(custom = "crate::utils::validation::validate_money")]
    pub amount_paid: Option<Decimal>,

    #[validate(custom = "crate::utils::validation::validate_money")]
    pub tip_amount: Option<Decimal>,

    #[serde(default, deserialize_with = "double_option")]
    pub worker_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,

    pub entry_time: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "double_option")]
    pub finish_time: Option<Option<DateTime<Utc>>>,
}

// Request para marcar el cobro (lavado o taller)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusRequest {
    pub payment_received: bool,
}

// Request para subir la captura de InstaPay
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadProofRequest {
    #[validate(custom = "crate::utils::validation::validate_base64_image")]
    pub instapay_proof: String,
}

// Precio de lista por tipo, para el formulario de recepción
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WashTypePrice {
    pub wash_type: WashType,
    pub list_price: Decimal,
}

impl WashTypePrice {
    pub fn catalog() -> Vec<WashTypePrice> {
        WashType::ALL
            .iter()
            .map(|&wash_type| WashTypePrice {
                wash_type,
                list_price: wash_type.list_price(),
            })
            .collect()
    }
}

// Query `?date=YYYY-MM-DD|month=YYYY-MM`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordRangeQuery {
    pub date: Option<String>,
    pub month: Option<String>,
}
