//! Precios del taller mecánico
//!
//! El total se calcula una sola vez al crear el registro y queda congelado
//! en `total_amount`; ediciones posteriores no lo recalculan.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dto::mechanic_dto::{CreateMechanicRecordRequest, UpdateMechanicRecordRequest};
use crate::models::mechanic_record::{
    MechanicCategory, MechanicRecord, MechanicServiceType, OilType,
};
use crate::models::wash_record::PaymentType;
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::plate::search_key;
use crate::utils::validation::validate_range;

pub const FILTER_PRICE_MIN: i64 = 350;
pub const FILTER_PRICE_MAX: i64 = 500;

/// Precio del aceite en EGP.
pub fn oil_price(oil_type: OilType) -> Decimal {
    match oil_type {
        OilType::Shell4L => Decimal::from(2200),
        OilType::Shell5L => Decimal::from(2700),
        OilType::CustomerOwn => Decimal::ZERO,
    }
}

/// Mano de obra en EGP.
pub fn labor_cost(service_type: MechanicServiceType) -> Decimal {
    match service_type {
        MechanicServiceType::OilOnly => Decimal::from(200),
        MechanicServiceType::OilAndFilter => Decimal::from(300),
    }
}

/// Componentes del precio de un servicio.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub oil_type: Option<OilType>,
    pub oil_price: Decimal,
    pub service_type: Option<MechanicServiceType>,
    pub labor_cost: Decimal,
    pub filter_price: Decimal,
    pub service_name: Option<String>,
    pub service_price: Decimal,
    pub total_amount: Decimal,
}

/// Cambio de aceite: aceite + mano de obra + filtro (sólo con OIL_AND_FILTER).
pub fn price_oil_service(
    oil_type: Option<OilType>,
    service_type: Option<MechanicServiceType>,
    filter_price: Option<Decimal>,
) -> AppResult<PriceBreakdown> {
    let oil_type = oil_type.ok_or_else(|| validation_error("Oil type is required"))?;
    let service_type =
        service_type.ok_or_else(|| validation_error("Service type is required"))?;

    let filter_price = match service_type {
        MechanicServiceType::OilAndFilter => {
            let price = filter_price.ok_or_else(|| {
                validation_error("Filter price is required for oil and filter service")
            })?;
            validate_range(
                price,
                Decimal::from(FILTER_PRICE_MIN),
                Decimal::from(FILTER_PRICE_MAX),
            )
            .map_err(|_| {
                validation_error(format!(
                    "Filter price must be between {} and {}",
                    FILTER_PRICE_MIN, FILTER_PRICE_MAX
                ))
            })?;
            price
        }
        MechanicServiceType::OilOnly => Decimal::ZERO,
    };

    let oil_price = oil_price(oil_type);
    let labor_cost = labor_cost(service_type);
    Ok(PriceBreakdown {
        oil_type: Some(oil_type),
        oil_price,
        service_type: Some(service_type),
        labor_cost,
        filter_price,
        service_name: None,
        service_price: Decimal::ZERO,
        total_amount: oil_price + labor_cost + filter_price,
    })
}

/// Otro servicio: nombre libre y precio positivo.
pub fn price_other_service(
    service_name: Option<&str>,
    service_price: Option<Decimal>,
) -> AppResult<PriceBreakdown> {
    let name = service_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| validation_error("Service name is required"))?;
    let price = service_price
        .filter(|p| *p > Decimal::ZERO)
        .ok_or_else(|| validation_error("Service price must be greater than 0"))?;

    Ok(PriceBreakdown {
        oil_type: None,
        oil_price: Decimal::ZERO,
        service_type: None,
        labor_cost: Decimal::ZERO,
        filter_price: Decimal::ZERO,
        service_name: Some(name.to_string()),
        service_price: price,
        total_amount: price,
    })
}

/// Valores para insertar un servicio nuevo.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMechanicRecord {
    pub plate_number: String,
    pub car_type: Option<String>,
    pub phone_number: Option<String>,
    pub category: MechanicCategory,
    pub price: PriceBreakdown,
    pub payment_type: Option<PaymentType>,
    pub payment_received: bool,
    pub notes: Option<String>,
    pub worker_id: Option<Uuid>,
}

/// Valida la categoría, calcula el precio y normaliza la placa.
pub fn prepare_create(req: CreateMechanicRecordRequest) -> AppResult<NewMechanicRecord> {
    let plate_number = search_key(&req.plate_number);
    if plate_number.is_empty() {
        return Err(validation_error("Plate number is required"));
    }

    let price = match req.category {
        MechanicCategory::OilService => {
            price_oil_service(req.oil_type, req.service_type, req.filter_price)?
        }
        MechanicCategory::OtherService => {
            price_other_service(req.service_name.as_deref(), req.service_price)?
        }
    };

    Ok(NewMechanicRecord {
        plate_number,
        car_type: req.car_type.map(|v| v.trim().to_string()),
        phone_number: req.phone_number.map(|v| v.trim().to_string()),
        category: req.category,
        price,
        payment_type: req.payment_type,
        payment_received: req.payment_received.unwrap_or(false),
        notes: req.notes,
        worker_id: req.worker_id,
    })
}

/// Edición de un servicio. El precio queda como se calculó al crearlo.
pub fn apply_update(
    record: &MechanicRecord,
    req: UpdateMechanicRecordRequest,
) -> AppResult<MechanicRecord> {
    let mut updated = record.clone();
    if let Some(plate) = req.plate_number {
        let plate = search_key(&plate);
        if plate.is_empty() {
            return Err(validation_error("Plate number is required"));
        }
        updated.plate_number = plate;
    }
    if let Some(car_type) = req.car_type {
        updated.car_type = car_type.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    }
    if let Some(phone) = req.phone_number {
        updated.phone_number = phone.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    }
    if let Some(payment_type) = req.payment_type {
        updated.payment_type = payment_type;
    }
    if let Some(received) = req.payment_received {
        updated.payment_received = received;
    }
    if let Some(notes) = req.notes {
        updated.notes = notes;
    }
    if let Some(worker_id) = req.worker_id {
        updated.worker_id = worker_id;
    }
    Ok(updated)
}
