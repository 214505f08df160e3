//! Exportación a Excel
//!
//! Dos hojas: "Records" (una fila por lavado, columnas fijas) y "Summary"
//! (conteos, ingresos, desglose por tipo de lavado y por trabajador).
//! `build_report` es determinista y no toca el disco; `write_workbook`
//! serializa el resultado a `.xlsx` con rust_xlsxwriter.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use serde::Serialize;
use uuid::Uuid;

use crate::models::wash_record::{PaymentType, WashRecordWithWorker, WashStatus, WashType};
use crate::utils::date_range::format_business_datetime;
use crate::utils::errors::{internal_error, AppError, AppResult};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const HEADER_COLOR: u32 = 0x0284C7;
const EMPTY: &str = "-";

/// Encabezado y ancho de cada columna de la hoja "Records".
pub const RECORD_COLUMNS: [(&str, f64); 12] = [
    ("Plate Number", 15.0),
    ("Car Type", 20.0),
    ("Wash Type", 12.0),
    ("Worker", 15.0),
    ("Entry Time", 20.0),
    ("Finish Time", 20.0),
    ("Elapsed Minutes", 15.0),
    ("Payment Type", 13.0),
    ("Amount Paid (EGP)", 17.0),
    ("Tip Amount (EGP)", 15.0),
    ("Notes", 25.0),
    ("Status", 12.0),
];

const SUMMARY_COLUMNS: [(&str, f64); 2] = [("Metric", 25.0), ("Value", 20.0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Daily,
    Monthly,
}

impl ReportType {
    pub fn title(self) -> &'static str {
        match self {
            ReportType::Daily => "Daily Report",
            ReportType::Monthly => "Monthly Report",
        }
    }
}

/// Valor de una celda.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Money(Decimal),
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    fn text_or_dash(value: Option<&str>) -> Self {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => Cell::text(v),
            None => Cell::text(EMPTY),
        }
    }

    fn blank() -> Self {
        Cell::text("")
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WashTypeSummary {
    pub wash_type: WashType,
    pub count: u32,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSummary {
    pub worker_id: Option<Uuid>,
    pub worker_name: String,
    pub count: u32,
    pub revenue: Decimal,
    pub tips: Decimal,
}

/// Resumen de un conjunto de lavados (también servido como JSON).
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_cars: u32,
    pub finished_cars: u32,
    pub in_progress_cars: u32,
    pub cancelled_cars: u32,
    pub total_revenue: Decimal,
    pub total_tips: Decimal,
    pub total_cash: Decimal,
    pub total_instapay: Decimal,
    /// En el orden en que aparece cada tipo.
    pub by_wash_type: Vec<WashTypeSummary>,
    /// En el orden en que aparece cada trabajador; "Unassigned" sin trabajador.
    pub by_worker: Vec<WorkerSummary>,
}

pub fn summarize(records: &[WashRecordWithWorker]) -> ReportSummary {
    let mut summary = ReportSummary::default();

    for item in records {
        let record = &item.record;
        summary.total_cars += 1;
        match record.status {
            WashStatus::Finished => summary.finished_cars += 1,
            WashStatus::InProgress => summary.in_progress_cars += 1,
            WashStatus::Cancelled => summary.cancelled_cars += 1,
        }
        summary.total_revenue += record.amount_paid;
        summary.total_tips += record.tip_amount;
        match record.payment_type {
            Some(PaymentType::Cash) => summary.total_cash += record.amount_paid,
            Some(PaymentType::Instapay) => summary.total_instapay += record.amount_paid,
            None => {}
        }

        match summary
            .by_wash_type
            .iter_mut()
            .find(|s| s.wash_type == record.wash_type)
        {
            Some(entry) => {
                entry.count += 1;
                entry.revenue += record.amount_paid;
            }
            None => summary.by_wash_type.push(WashTypeSummary {
                wash_type: record.wash_type,
                count: 1,
                revenue: record.amount_paid,
            }),
        }

        let worker_id = item.worker.as_ref().map(|w| w.id);
        match summary
            .by_worker
            .iter_mut()
            .find(|s| s.worker_id == worker_id)
        {
            Some(entry) => {
                entry.count += 1;
                entry.revenue += record.amount_paid;
                entry.tips += record.tip_amount;
            }
            None => summary.by_worker.push(WorkerSummary {
                worker_id,
                worker_name: item.worker_name().unwrap_or("Unassigned").to_string(),
                count: 1,
                revenue: record.amount_paid,
                tips: record.tip_amount,
            }),
        }
    }

    summary
}

/// Contenido completo del libro, listo para escribir.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadsheetReport {
    pub report_type: ReportType,
    pub label: String,
    pub record_rows: Vec<Vec<Cell>>,
    pub summary_rows: Vec<(String, Cell)>,
    pub summary: ReportSummary,
}

fn record_row(item: &WashRecordWithWorker) -> Vec<Cell> {
    let r = &item.record;
    vec![
        Cell::text(r.plate_number.as_str()),
        Cell::text_or_dash(r.car_type.as_deref()),
        Cell::text(r.wash_type.as_str()),
        Cell::text_or_dash(item.worker_name()),
        Cell::text(format_business_datetime(r.entry_time)),
        r.finish_time
            .map(|t| Cell::text(format_business_datetime(t)))
            .unwrap_or_else(|| Cell::text(EMPTY)),
        r.elapsed_minutes
            .map(|m| Cell::Integer(i64::from(m)))
            .unwrap_or_else(|| Cell::text(EMPTY)),
        Cell::text_or_dash(r.payment_type.map(PaymentType::as_str)),
        Cell::Money(r.amount_paid),
        Cell::Money(r.tip_amount),
        Cell::text_or_dash(r.notes.as_deref()),
        Cell::text(r.status.as_str()),
    ]
}

fn summary_rows(summary: &ReportSummary, report_type: ReportType, label: &str) -> Vec<(String, Cell)> {
    let count = |n: u32| Cell::Integer(i64::from(n));
    let mut rows = vec![
        ("Report Date".to_string(), Cell::text(label)),
        ("Report Type".to_string(), Cell::text(report_type.title())),
        (String::new(), Cell::blank()),
        ("Total Cars".to_string(), count(summary.total_cars)),
        ("Finished Cars".to_string(), count(summary.finished_cars)),
        ("In Progress Cars".to_string(), count(summary.in_progress_cars)),
        ("Cancelled Cars".to_string(), count(summary.cancelled_cars)),
        (String::new(), Cell::blank()),
        ("Total Revenue (EGP)".to_string(), Cell::Money(summary.total_revenue)),
        ("Total Tips (EGP)".to_string(), Cell::Money(summary.total_tips)),
        ("Total Cash (EGP)".to_string(), Cell::Money(summary.total_cash)),
        ("Total InstaPay (EGP)".to_string(), Cell::Money(summary.total_instapay)),
        (String::new(), Cell::blank()),
        ("--- Breakdown by Wash Type ---".to_string(), Cell::blank()),
    ];

    for entry in &summary.by_wash_type {
        let name = entry.wash_type.as_str();
        rows.push((format!("{} - Count", name), count(entry.count)));
        rows.push((format!("{} - Revenue (EGP)", name), Cell::Money(entry.revenue)));
    }

    rows.push((String::new(), Cell::blank()));
    rows.push(("--- Totals by Worker ---".to_string(), Cell::blank()));

    for entry in &summary.by_worker {
        let name = &entry.worker_name;
        rows.push((format!("{} - Count", name), count(entry.count)));
        rows.push((format!("{} - Revenue (EGP)", name), Cell::Money(entry.revenue)));
        rows.push((format!("{} - Tips (EGP)", name), Cell::Money(entry.tips)));
    }

    rows
}

/// Arma ambas hojas. `records` debe venir ordenado por hora de entrada.
pub fn build_report(
    records: &[WashRecordWithWorker],
    report_type: ReportType,
    label: &str,
) -> SpreadsheetReport {
    let summary = summarize(records);
    SpreadsheetReport {
        report_type,
        label: label.to_string(),
        record_rows: records.iter().map(record_row).collect(),
        summary_rows: summary_rows(&summary, report_type, label),
        summary,
    }
}

pub fn export_filename(label: &str) -> String {
    format!("carwash_{}.xlsx", label)
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_COLOR))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
}

fn body_format() -> Format {
    Format::new()
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    format: &Format,
) -> Result<(), XlsxError> {
    match cell {
        Cell::Text(text) => sheet.write_string_with_format(row, col, text.as_str(), format)?,
        Cell::Integer(n) => sheet.write_number_with_format(row, col, *n as f64, format)?,
        Cell::Money(amount) => {
            sheet.write_number_with_format(row, col, amount.to_f64().unwrap_or_default(), format)?
        }
    };
    Ok(())
}

fn write_header(sheet: &mut Worksheet, columns: &[(&str, f64)]) -> Result<(), XlsxError> {
    let header = header_format();
    for (col, (title, width)) in columns.iter().enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, *width)?;
        sheet.write_string_with_format(0, col, *title, &header)?;
    }
    Ok(())
}

fn render(report: &SpreadsheetReport) -> Result<Vec<u8>, XlsxError> {
    let body = body_format();
    let mut workbook = Workbook::new();

    let mut records = Worksheet::new();
    records.set_name("Records")?;
    write_header(&mut records, &RECORD_COLUMNS)?;
    for (i, row) in report.record_rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            write_cell(&mut records, i as u32 + 1, col as u16, cell, &body)?;
        }
    }
    workbook.push_worksheet(records);

    let mut summary = Worksheet::new();
    summary.set_name("Summary")?;
    write_header(&mut summary, &SUMMARY_COLUMNS)?;
    for (i, (metric, value)) in report.summary_rows.iter().enumerate() {
        let row = i as u32 + 1;
        summary.write_string_with_format(row, 0, metric.as_str(), &body)?;
        write_cell(&mut summary, row, 1, value, &body)?;
    }
    workbook.push_worksheet(summary);

    workbook.save_to_buffer()
}

/// Serializa el libro a bytes `.xlsx`.
pub fn write_workbook(report: &SpreadsheetReport) -> AppResult<Vec<u8>> {
    render(report).map_err(|e| -> AppError {
        internal_error(&format!("Failed to render {} spreadsheet: {}", report.label, e))
    })
}
