//! Ciclo de vida de un lavado
//!
//! `IN_PROGRESS → FINISHED` o `IN_PROGRESS → CANCELLED`; ambos estados son
//! finales. Las funciones de este módulo son puras: reciben el registro
//! actual y la petición, y devuelven el registro resultante. La escritura
//! condicional (`WHERE status = 'IN_PROGRESS'`) vive en el repositorio.
//!
//! Invariantes que se mantienen en cada operación:
//! - `washType == FREE` implica `amountPaid == 0` y `paymentType == null`
//! - `IN_PROGRESS` implica `finishTime == null`; los estados finales lo tienen
//! - `amountPaid > 0` exige `paymentType`
//! - la captura de InstaPay sólo existe si `paymentType == INSTAPAY`

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dto::wash_record_dto::{
    CancelWashRecordRequest, CreateWashRecordRequest, FinishWashRecordRequest,
    UpdateWashRecordRequest,
};
use crate::models::wash_record::{PaymentType, WashRecord, WashStatus, WashType};
use crate::utils::date_range::elapsed_minutes;
use crate::utils::errors::{validation_error, AppError, AppResult};
use crate::utils::plate::normalize_plate;

/// Valores para insertar un lavado nuevo.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWashRecord {
    pub plate_number: String,
    pub car_type: Option<String>,
    pub phone_number: Option<String>,
    pub wash_type: WashType,
    pub payment_type: Option<PaymentType>,
    pub amount_paid: Decimal,
    pub tip_amount: Decimal,
    pub worker_id: Option<Uuid>,
    pub notes: Option<String>,
    pub entry_time: DateTime<Utc>,
}

/// Texto opcional recortado; vacío equivale a null.
fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Fuerza las reglas de pago: FREE no cobra, y un monto positivo
/// necesita medio de pago.
fn settle_payment(
    wash_type: WashType,
    amount_paid: Decimal,
    payment_type: Option<PaymentType>,
) -> AppResult<(Decimal, Option<PaymentType>)> {
    if wash_type == WashType::Free {
        return Ok((Decimal::ZERO, None));
    }
    if amount_paid > Decimal::ZERO && payment_type.is_none() {
        return Err(validation_error("Payment type is required for paid washes"));
    }
    Ok((amount_paid, payment_type))
}

fn ensure_in_progress(record: &WashRecord) -> AppResult<()> {
    match record.status {
        WashStatus::InProgress => Ok(()),
        WashStatus::Finished => Err(AppError::Conflict("Record is already finished".into())),
        WashStatus::Cancelled => Err(AppError::Conflict("Record is already cancelled".into())),
    }
}

/// Normaliza una entrada nueva. El trabajador se valida aparte.
pub fn prepare_create(
    req: CreateWashRecordRequest,
    now: DateTime<Utc>,
) -> AppResult<NewWashRecord> {
    let plate_number = normalize_plate(&req.plate_number);
    if plate_number.is_empty() {
        return Err(validation_error("Plate number is required"));
    }

    let (amount_paid, payment_type) = settle_payment(
        req.wash_type,
        req.amount_paid.unwrap_or(Decimal::ZERO),
        req.payment_type,
    )?;

    Ok(NewWashRecord {
        plate_number,
        car_type: clean_text(req.car_type),
        phone_number: clean_text(req.phone_number),
        wash_type: req.wash_type,
        payment_type,
        amount_paid,
        tip_amount: req.tip_amount.unwrap_or(Decimal::ZERO),
        worker_id: req.worker_id,
        notes: clean_text(req.notes),
        entry_time: now,
    })
}

/// Termina un lavado en curso. Los campos de pago enviados reemplazan
/// a los guardados ("pago al terminar").
pub fn apply_finish(
    record: &WashRecord,
    req: FinishWashRecordRequest,
    now: DateTime<Utc>,
) -> AppResult<WashRecord> {
    ensure_in_progress(record)?;

    let payment_type = req.payment_type.unwrap_or(record.payment_type);
    let amount = req.amount_paid.unwrap_or(record.amount_paid);
    let (amount_paid, payment_type) = settle_payment(record.wash_type, amount, payment_type)?;

    let mut finished = record.clone();
    finished.status = WashStatus::Finished;
    finished.finish_time = Some(now);
    finished.elapsed_minutes = Some(elapsed_minutes(record.entry_time, now));
    finished.amount_paid = amount_paid;
    finished.payment_type = payment_type;
    finished.tip_amount = req.tip_amount.unwrap_or(record.tip_amount);
    if finished.payment_type != Some(PaymentType::Instapay) {
        finished.instapay_proof = None;
    }
    Ok(finished)
}

/// Cancela un lavado en curso ("se fue sin terminar"). Lo cobrado
/// reemplaza al monto guardado y define `paymentReceived`.
pub fn apply_cancel(
    record: &WashRecord,
    req: CancelWashRecordRequest,
    now: DateTime<Utc>,
) -> AppResult<WashRecord> {
    ensure_in_progress(record)?;

    let amount = if record.wash_type == WashType::Free {
        Decimal::ZERO
    } else {
        req.amount_paid.unwrap_or(Decimal::ZERO)
    };
    let payment_type = if amount > Decimal::ZERO {
        let payment_type = req.payment_type.or(record.payment_type);
        if payment_type.is_none() {
            return Err(validation_error(
                "Payment type is required when an amount was paid",
            ));
        }
        payment_type
    } else {
        None
    };

    let mut cancelled = record.clone();
    cancelled.status = WashStatus::Cancelled;
    cancelled.finish_time = Some(now);
    cancelled.amount_paid = amount;
    cancelled.payment_type = payment_type;
    cancelled.payment_received = amount > Decimal::ZERO;
    cancelled.notes = clean_text(req.notes);
    if cancelled.payment_type != Some(PaymentType::Instapay) {
        cancelled.instapay_proof = None;
    }
    Ok(cancelled)
}

/// Aplica una edición libre y devuelve el registro resultante.
pub fn apply_update(record: &WashRecord, req: UpdateWashRecordRequest) -> AppResult<WashRecord> {
    let mut updated = record.clone();

    if let Some(plate) = req.plate_number {
        let plate = normalize_plate(&plate);
        if plate.is_empty() {
            return Err(validation_error("Plate number is required"));
        }
        updated.plate_number = plate;
    }
    if let Some(car_type) = req.car_type {
        updated.car_type = clean_text(car_type);
    }
    if let Some(phone) = req.phone_number {
        updated.phone_number = clean_text(phone);
    }
    if let Some(notes) = req.notes {
        updated.notes = clean_text(notes);
    }
    if let Some(worker_id) = req.worker_id {
        updated.worker_id = worker_id;
    }
    if let Some(wash_type) = req.wash_type {
        updated.wash_type = wash_type;
    }
    if let Some(payment_type) = req.payment_type {
        updated.payment_type = payment_type;
    }
    if let Some(amount) = req.amount_paid {
        updated.amount_paid = amount;
    }
    if let Some(tip) = req.tip_amount {
        updated.tip_amount = tip;
    }

    let (amount_paid, payment_type) =
        settle_payment(updated.wash_type, updated.amount_paid, updated.payment_type)?;
    updated.amount_paid = amount_paid;
    updated.payment_type = payment_type;
    if updated.payment_type != Some(PaymentType::Instapay) {
        updated.instapay_proof = None;
    }

    let times_changed = req.entry_time.is_some() || req.finish_time.is_some();
    if let Some(entry) = req.entry_time {
        updated.entry_time = entry;
    }
    if let Some(finish) = req.finish_time {
        updated.finish_time = finish;
    }

    match (updated.status.is_terminal(), updated.finish_time) {
        (false, Some(_)) => {
            return Err(validation_error(
                "finishTime cannot be set while the record is in progress",
            ))
        }
        (true, None) => {
            return Err(validation_error(
                "finishTime is required once the record is finished or cancelled",
            ))
        }
        _ => {}
    }

    if times_changed {
        if let Some(finish) = updated.finish_time {
            if finish < updated.entry_time {
                return Err(validation_error("finishTime must not be before entryTime"));
            }
            updated.elapsed_minutes = Some(elapsed_minutes(updated.entry_time, finish));
        }
    }

    Ok(updated)
}

/// La captura sólo se acepta para pagos por InstaPay.
pub fn ensure_proof_allowed(record: &WashRecord) -> AppResult<()> {
    if record.payment_type != Some(PaymentType::Instapay) {
        return Err(validation_error(
            "InstaPay proof can only be attached to InstaPay payments",
        ));
    }
    Ok(())
}
