//! Exportación a Excel y resumen de reportes

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::controllers::wash_record_controller::WashRecordController;
use crate::dto::stats_dto::{DailyExportQuery, MonthlyExportQuery, ReportSummaryResponse};
use crate::dto::wash_record_dto::RecordRangeQuery;
use crate::services::excel_export::{
    build_report, export_filename, summarize, write_workbook, ReportType,
};
use crate::utils::date_range::{
    day_range, month_label, month_range, parse_day, parse_month, today, DateRange,
};
use crate::utils::errors::AppResult;

/// Libro listo para descargar.
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct ReportController {
    records: WashRecordController,
}

impl ReportController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            records: WashRecordController::new(pool),
        }
    }

    pub async fn export_daily(&self, query: DailyExportQuery) -> AppResult<ExportFile> {
        let date = match non_blank(query.date.as_deref()) {
            Some(value) => parse_day(value)?,
            None => today(Utc::now()),
        };
        self.export(day_range(date), ReportType::Daily, day_label(date))
            .await
    }

    pub async fn export_monthly(&self, query: MonthlyExportQuery) -> AppResult<ExportFile> {
        let first = match non_blank(query.month.as_deref()) {
            Some(value) => parse_month(value)?,
            None => today(Utc::now()),
        };
        self.export(month_range(first), ReportType::Monthly, month_label(first))
            .await
    }

    /// El mismo resumen de la hoja "Summary", como JSON.
    pub async fn summary(&self, query: RecordRangeQuery) -> AppResult<ReportSummaryResponse> {
        let (range, label) = match (
            non_blank(query.date.as_deref()),
            non_blank(query.month.as_deref()),
        ) {
            (Some(date), _) => {
                let date = parse_day(date)?;
                (day_range(date), day_label(date))
            }
            (None, Some(month)) => {
                let first = parse_month(month)?;
                (month_range(first), month_label(first))
            }
            (None, None) => {
                let date = today(Utc::now());
                (day_range(date), day_label(date))
            }
        };

        let records = self.records.list_chronological(range).await?;
        Ok(ReportSummaryResponse {
            label,
            start_date: range.start,
            end_date: range.end,
            summary: summarize(&records),
        })
    }

    async fn export(
        &self,
        range: DateRange,
        report_type: ReportType,
        label: String,
    ) -> AppResult<ExportFile> {
        let records = self.records.list_chronological(range).await?;
        let report = build_report(&records, report_type, &label);
        let bytes = write_workbook(&report)?;
        info!(
            "📊 {} export {} built: {} records, {} bytes",
            report_type.title(),
            label,
            records.len(),
            bytes.len()
        );

        Ok(ExportFile {
            filename: export_filename(&label),
            bytes,
        })
    }
}

fn day_label(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
