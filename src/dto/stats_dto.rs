//! DTOs de estadísticas, reportes, exportación y búsqueda de clientes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::excel_export::ReportSummary;
use crate::services::worker_stats::WorkerStatsReport;

/// Ventana de tiempo de `/worker-stats`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    #[default]
    Day,
    Week,
    Month,
}

impl StatsPeriod {
    /// Periodos desconocidos caen en `day`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("week") => StatsPeriod::Week,
            Some("month") => StatsPeriod::Month,
            _ => StatsPeriod::Day,
        }
    }
}

// Query de /worker-stats
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerStatsQuery {
    pub period: Option<String>,
    pub date: Option<String>,
    pub month: Option<String>,
}

// Response de /worker-stats
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerStatsResponse {
    pub period: StatsPeriod,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(flatten)]
    pub report: WorkerStatsReport,
}

// Query de /export/daily
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyExportQuery {
    pub date: Option<String>,
}

// Query de /export/monthly
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthlyExportQuery {
    pub month: Option<String>,
}

// Response de /reports/summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummaryResponse {
    pub label: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(flatten)]
    pub summary: ReportSummary,
}

// Query de /customers/search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerSearchQuery {
    pub plate: Option<String>,
}
