use chrono::Utc;
use sqlx::PgPool;

use crate::dto::stats_dto::{StatsPeriod, WorkerStatsQuery, WorkerStatsResponse};
use crate::repositories::{WashRecordRepository, WorkerRepository};
use crate::services::worker_stats::aggregate;
use crate::utils::date_range::{
    day_range, month_range, parse_day, parse_month, today, week_range, DateRange,
};
use crate::utils::errors::AppResult;

pub struct WorkerStatsController {
    records: WashRecordRepository,
    workers: WorkerRepository,
}

impl WorkerStatsController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            records: WashRecordRepository::new(pool.clone()),
            workers: WorkerRepository::new(pool),
        }
    }

    pub async fn stats(&self, query: WorkerStatsQuery) -> AppResult<WorkerStatsResponse> {
        let period = StatsPeriod::parse(query.period.as_deref());
        let range = resolve_period(period, query.date.as_deref(), query.month.as_deref())?;

        let records = self.records.find_in_range(range, true).await?;
        let workers = self.workers.list_by_name().await?;

        Ok(WorkerStatsResponse {
            period,
            start_date: range.start,
            end_date: range.end,
            report: aggregate(&records, &workers),
        })
    }
}

/// Ventana de la consulta. `month` sólo se usa con `period=month`; sin él
/// se toma el mes de `date` o el actual.
pub fn resolve_period(
    period: StatsPeriod,
    date: Option<&str>,
    month: Option<&str>,
) -> AppResult<DateRange> {
    let date = match date.filter(|d| !d.trim().is_empty()) {
        Some(value) => parse_day(value)?,
        None => today(Utc::now()),
    };
    match period {
        StatsPeriod::Day => Ok(day_range(date)),
        StatsPeriod::Week => Ok(week_range(date)),
        StatsPeriod::Month => match month.filter(|m| !m.trim().is_empty()) {
            Some(value) => Ok(month_range(parse_month(value)?)),
            None => Ok(month_range(date)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_week_period_starts_on_sunday() {
        let range = resolve_period(StatsPeriod::Week, Some("2024-01-17"), None).unwrap();
        assert_eq!(range, week_range(NaiveDate::from_ymd_opt(2024, 1, 14).unwrap()));
    }

    #[test]
    fn test_month_param_wins_for_month_period() {
        let range =
            resolve_period(StatsPeriod::Month, Some("2024-01-17"), Some("2024-03")).unwrap();
        assert_eq!(range, month_range(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    }

    #[test]
    fn test_month_period_falls_back_to_date() {
        let range = resolve_period(StatsPeriod::Month, Some("2024-02-10"), None).unwrap();
        assert_eq!(range, month_range(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
    }

    #[test]
    fn test_day_period_ignores_month() {
        let range = resolve_period(StatsPeriod::Day, Some("2024-02-10"), Some("2024-05")).unwrap();
        assert_eq!(range, day_range(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(resolve_period(StatsPeriod::Day, Some("10/02/2024"), None).is_err());
    }
}
