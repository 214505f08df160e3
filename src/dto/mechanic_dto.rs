//! DTOs del taller mecánico
//!
//! Los precios de componentes y el total los calcula el servidor; si el
//! cliente manda `oilPrice`, `laborCost` o `totalAmount` se ignoran.

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::mechanic_record::{MechanicCategory, MechanicServiceType, OilType};
use crate::models::wash_record::PaymentType;
use crate::utils::serde_helpers::{double_option, empty_string_as_none};

// Request para registrar un servicio
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMechanicRecordRequest {
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

    pub category: MechanicCategory,

    #[serde(default)]
    pub oil_type: Option<OilType>,

    #[serde(default)]
    pub service_type: Option<MechanicServiceType>,

    #[validate(custom = "crate::utils::validation::validate_money")]
    pub filter_price: Option<Decimal>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 100))]
    pub service_name: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_money")]
    pub service_price: Option<Decimal>,

    #[serde(default)]
    pub payment_type: Option<PaymentType>,

    #[serde(default)]
    pub payment_received: Option<bool>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 500))]
    pub notes: Option<String>,

    #[serde(default)]
    pub worker_id: Option<Uuid>,
}

// Request de edición: sólo campos que no afectan el precio congelado
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMechanicRecordRequest {
    #[validate(
        custom = "crate::utils::validation::validate_not_empty",
        length(max = 30)
    )]
    pub plate_number: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub car_type: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub phone_number: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub payment_type: Option<Option<PaymentType>>,

    pub payment_received: Option<bool>,

    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub worker_id: Option<Option<Uuid>>,
}
