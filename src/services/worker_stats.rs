//! Estadísticas por trabajador
//!
//! Función pura sobre los registros ya leídos de la ventana pedida; no hay
//! caché, cada petición recalcula desde cero. Los registros CANCELLED
//! cuentan igual que los demás con el monto que se cobró al cancelar.
//!
//! `netRevenue = totalRevenue - instapayTips`: las propinas por InstaPay
//! entran a la cuenta del negocio y hay que entregárselas al trabajador.
//! Las propinas en efectivo nunca pasan por caja, así que no se restan.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::wash_record::{PaymentType, WashRecord, WashStatus, WashType};
use crate::models::worker::Worker;

/// Cantidad de autos por tipo de lavado.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct WashTypeCounts {
    pub inner: u32,
    pub outer: u32,
    pub full: u32,
    pub free: u32,
}

impl WashTypeCounts {
    fn add(&mut self, wash_type: WashType) {
        match wash_type {
            WashType::Inner => self.inner += 1,
            WashType::Outer => self.outer += 1,
            WashType::Full => self.full += 1,
            WashType::Free => self.free += 1,
        }
    }
}

/// Totales de un grupo de registros (un trabajador, sin asignar o todos).
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BucketStats {
    pub total_cars: u32,
    pub finished_cars: u32,
    pub total_revenue: Decimal,
    pub total_tips: Decimal,
    pub cash_revenue: Decimal,
    pub instapay_revenue: Decimal,
    pub cash_tips: Decimal,
    pub instapay_tips: Decimal,
    pub net_revenue: Decimal,
    pub by_wash_type: WashTypeCounts,
}

impl BucketStats {
    fn add(&mut self, record: &WashRecord) {
        self.total_cars += 1;
        if record.status == WashStatus::Finished {
            self.finished_cars += 1;
        }
        self.total_revenue += record.amount_paid;
        self.total_tips += record.tip_amount;
        match record.payment_type {
            Some(PaymentType::Cash) => {
                self.cash_revenue += record.amount_paid;
                self.cash_tips += record.tip_amount;
            }
            Some(PaymentType::Instapay) => {
                self.instapay_revenue += record.amount_paid;
                self.instapay_tips += record.tip_amount;
            }
            None => {}
        }
        self.net_revenue = self.total_revenue - self.instapay_tips;
        self.by_wash_type.add(record.wash_type);
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a WashRecord>) -> Self {
        let mut stats = BucketStats::default();
        for record in records {
            stats.add(record);
        }
        stats
    }
}

/// Estadísticas de un trabajador; `worker` es null para "sin asignar".
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerStatsEntry {
    pub worker: Option<Worker>,
    pub stats: BucketStats,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerStatsReport {
    /// Trabajadores activos con autos, y luego "sin asignar" si tiene autos.
    pub worker_stats: Vec<WorkerStatsEntry>,
    /// Todos los trabajadores, sin filtrar.
    pub all_worker_stats: Vec<WorkerStatsEntry>,
    pub unassigned_stats: WorkerStatsEntry,
    pub totals: BucketStats,
}

/// Agrega `records` por trabajador respetando el orden de `workers`.
pub fn aggregate(records: &[WashRecord], workers: &[Worker]) -> WorkerStatsReport {
    let stats_for = |worker_id: Option<Uuid>| {
        BucketStats::from_records(records.iter().filter(|r| r.worker_id == worker_id))
    };

    let all_worker_stats: Vec<WorkerStatsEntry> = workers
        .iter()
        .map(|worker| WorkerStatsEntry {
            worker: Some(worker.clone()),
            stats: stats_for(Some(worker.id)),
        })
        .collect();

    let unassigned_stats = WorkerStatsEntry {
        worker: None,
        stats: stats_for(None),
    };

    let mut worker_stats: Vec<WorkerStatsEntry> = all_worker_stats
        .iter()
        .filter(|entry| {
            entry.stats.total_cars > 0 && entry.worker.as_ref().is_some_and(|w| w.is_active)
        })
        .cloned()
        .collect();
    if unassigned_stats.stats.total_cars > 0 {
        worker_stats.push(unassigned_stats.clone());
    }

    WorkerStatsReport {
        worker_stats,
        all_worker_stats,
        unassigned_stats,
        totals: BucketStats::from_records(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn worker(name: &str, active: bool) -> Worker {
        Worker {
            id: Uuid::new_v4(),
            name: name.into(),
            role: Default::default(),
            is_active: active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn record(
        worker_id: Option<Uuid>,
        wash_type: WashType,
        status: WashStatus,
        payment_type: Option<PaymentType>,
        amount: i64,
        tip: i64,
    ) -> WashRecord {
        let now = Utc::now();
        WashRecord {
            id: Uuid::new_v4(),
            plate_number: "ABC1234".into(),
            car_type: None,
            phone_number: None,
            wash_type,
            payment_type,
            amount_paid: dec(amount),
            tip_amount: dec(tip),
            payment_received: false,
            instapay_proof: None,
            worker_id,
            status,
            entry_time: now,
            finish_time: None,
            elapsed_minutes: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample() -> (Vec<Worker>, Vec<WashRecord>) {
        let ahmed = worker("Ahmed", true);
        let ali = worker("Ali", true);
        let hassan = worker("Hassan", false);
        let records = vec![
            record(Some(ahmed.id), WashType::Full, WashStatus::Finished, Some(PaymentType::Cash), 170, 20),
            record(Some(ahmed.id), WashType::Outer, WashStatus::Finished, Some(PaymentType::Instapay), 90, 30),
            record(Some(ahmed.id), WashType::Inner, WashStatus::Cancelled, None, 0, 0),
            record(Some(hassan.id), WashType::Inner, WashStatus::Finished, Some(PaymentType::Cash), 90, 0),
            record(None, WashType::Free, WashStatus::InProgress, None, 0, 0),
            record(None, WashType::Outer, WashStatus::Finished, Some(PaymentType::Instapay), 90, 10),
        ];
        (vec![ahmed, ali, hassan], records)
    }

    #[test]
    fn test_worker_bucket_breakdown() {
        let (workers, records) = sample();
        let report = aggregate(&records, &workers);
        let ahmed = &report.all_worker_stats[0].stats;
        assert_eq!(ahmed.total_cars, 3);
        assert_eq!(ahmed.finished_cars, 2);
        assert_eq!(ahmed.total_revenue, dec(260));
        assert_eq!(ahmed.total_tips, dec(50));
        assert_eq!(ahmed.cash_revenue, dec(170));
        assert_eq!(ahmed.instapay_revenue, dec(90));
        assert_eq!(ahmed.cash_tips, dec(20));
        assert_eq!(ahmed.instapay_tips, dec(30));
        assert_eq!(ahmed.net_revenue, dec(230));
        assert_eq!(
            ahmed.by_wash_type,
            WashTypeCounts { inner: 1, outer: 1, full: 1, free: 0 }
        );
    }

    #[test]
    fn test_revenue_partitions_into_totals() {
        let (workers, records) = sample();
        let report = aggregate(&records, &workers);
        let per_worker: Decimal = report
            .all_worker_stats
            .iter()
            .map(|e| e.stats.total_revenue)
            .sum();
        assert_eq!(
            per_worker + report.unassigned_stats.stats.total_revenue,
            report.totals.total_revenue
        );
        assert_eq!(report.totals.total_cars, 6);
    }

    #[test]
    fn test_net_revenue_never_subtracts_cash_tips() {
        let (workers, records) = sample();
        let report = aggregate(&records, &workers);
        for entry in report.all_worker_stats.iter().chain([&report.unassigned_stats]) {
            assert_eq!(
                entry.stats.net_revenue,
                entry.stats.total_revenue - entry.stats.instapay_tips
            );
        }
        assert_eq!(report.totals.net_revenue, dec(440) - dec(40));
    }

    #[test]
    fn test_visible_list_skips_idle_and_inactive_workers() {
        let (workers, records) = sample();
        let report = aggregate(&records, &workers);
        let names: Vec<Option<&str>> = report
            .worker_stats
            .iter()
            .map(|e| e.worker.as_ref().map(|w| w.name.as_str()))
            .collect();
        // Ali no tiene autos y Hassan está inactivo; el último es "sin asignar"
        assert_eq!(names, vec![Some("Ahmed"), None]);
        assert_eq!(report.all_worker_stats.len(), 3);
    }

    #[test]
    fn test_empty_window() {
        let (workers, _) = sample();
        let report = aggregate(&[], &workers);
        assert!(report.worker_stats.is_empty());
        assert_eq!(report.totals, BucketStats::default());
    }
}
