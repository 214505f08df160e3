//! Rangos de fechas en la zona horaria del negocio
//!
//! Todo "día" y "mes" se interpreta en Africa/Cairo, sin importar la zona
//! horaria del servidor. Las horas locales se resuelven con la base de datos
//! de zonas (Egipto volvió a aplicar horario de verano en 2023): una medianoche
//! inexistente se resuelve al primer instante válido posterior y un
//! 23:59:59.999 ambiguo al instante más tardío.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::validate_date;

pub const BUSINESS_TZ: Tz = chrono_tz::Africa::Cairo;

lazy_static! {
    static ref MONTH_RE: Regex = Regex::new(r"^(\d{4})-(\d{2})$").unwrap();
}

/// Intervalo cerrado `[start, end]` expresado en UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Primer instante real en o después de una hora local dada.
fn first_instant_at_or_after(naive: NaiveDateTime) -> DateTime<Utc> {
    let mut candidate = naive;
    // Los huecos de horario de verano duran como mucho un par de horas.
    for _ in 0..8 {
        if let Some(dt) = BUSINESS_TZ.from_local_datetime(&candidate).earliest() {
            return dt.with_timezone(&Utc);
        }
        candidate += Duration::minutes(30);
    }
    Utc.from_utc_datetime(&naive)
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    first_instant_at_or_after(date.and_time(NaiveTime::MIN))
}

/// Día calendario completo: medianoche local hasta 23:59:59.999 local.
pub fn day_range(date: NaiveDate) -> DateRange {
    let next = date.succ_opt().unwrap_or(NaiveDate::MAX);
    DateRange {
        start: day_start(date),
        end: day_start(next) - Duration::milliseconds(1),
    }
}

/// Mes calendario completo que contiene `date`.
pub fn month_range(date: NaiveDate) -> DateRange {
    let first = date.with_day(1).unwrap_or(date);
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    let next_first = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX);
    DateRange {
        start: day_start(first),
        end: day_start(next_first) - Duration::milliseconds(1),
    }
}

/// Semana de domingo a sábado que contiene `date`.
pub fn week_range(date: NaiveDate) -> DateRange {
    let offset = i64::from(date.weekday().num_days_from_sunday());
    let sunday = date - Duration::days(offset);
    let saturday = sunday + Duration::days(6);
    DateRange {
        start: day_range(sunday).start,
        end: day_range(saturday).end,
    }
}

/// Fecha calendario actual en la zona del negocio.
pub fn today(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&BUSINESS_TZ).date_naive()
}

/// Etiqueta `YYYY-MM` del mes en curso en la zona del negocio.
pub fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn parse_day(value: &str) -> AppResult<NaiveDate> {
    validate_date(value.trim())
        .map_err(|_| validation_error(format!("Invalid date '{}', expected YYYY-MM-DD", value)))
}

/// Devuelve el primer día del mes indicado como `YYYY-MM`.
pub fn parse_month(value: &str) -> AppResult<NaiveDate> {
    let invalid = || validation_error(format!("Invalid month '{}', expected YYYY-MM", value));
    let caps = MONTH_RE.captures(value.trim()).ok_or_else(invalid)?;
    let year: i32 = caps[1].parse().map_err(|_| invalid())?;
    let month: u32 = caps[2].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

/// Resuelve los parámetros `date` / `month` de un listado; por defecto, hoy.
pub fn resolve_range(
    date: Option<&str>,
    month: Option<&str>,
    now: DateTime<Utc>,
) -> AppResult<DateRange> {
    match (non_blank(date), non_blank(month)) {
        (Some(d), _) => Ok(day_range(parse_day(d)?)),
        (None, Some(m)) => Ok(month_range(parse_month(m)?)),
        (None, None) => Ok(day_range(today(now))),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Minutos transcurridos, redondeando medios hacia arriba.
pub fn elapsed_minutes(entry: DateTime<Utc>, finish: DateTime<Utc>) -> i32 {
    let millis = (finish - entry).num_milliseconds() as f64;
    (millis / 60_000.0 + 0.5).floor() as i32
}

pub fn format_business_datetime(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&BUSINESS_TZ)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn winter_day_is_utc_plus_two() {
        let range = day_range(date("2024-01-15"));
        assert_eq!(range.start, utc("2024-01-14T22:00:00Z"));
        assert_eq!(range.end, utc("2024-01-15T21:59:59.999Z"));
    }

    #[test]
    fn summer_day_uses_daylight_offset() {
        let range = day_range(date("2024-07-10"));
        assert_eq!(range.start, utc("2024-07-09T21:00:00Z"));
        assert_eq!(range.end, utc("2024-07-10T20:59:59.999Z"));
    }

    #[test]
    fn day_without_midnight_starts_at_first_valid_instant() {
        // 2024-04-26: los relojes saltan de 00:00 a 01:00.
        let d = date("2024-04-26");
        let range = day_range(d);
        let local_start = range.start.with_timezone(&BUSINESS_TZ);
        assert_eq!(local_start.date_naive(), d);
        assert!(range.start < range.end);
        assert_eq!(
            range.end.with_timezone(&BUSINESS_TZ).date_naive(),
            d
        );
    }

    #[test]
    fn month_range_covers_leap_february() {
        let range = month_range(parse_month("2024-02").unwrap());
        assert_eq!(range.start, utc("2024-01-31T22:00:00Z"));
        assert_eq!(range.end, utc("2024-02-29T21:59:59.999Z"));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let range = month_range(parse_month("2023-12").unwrap());
        assert_eq!(range.start, utc("2023-11-30T22:00:00Z"));
        assert_eq!(range.end, utc("2023-12-31T21:59:59.999Z"));
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2024-01-17 es miércoles.
        let range = week_range(date("2024-01-17"));
        assert_eq!(range.start, utc("2024-01-13T22:00:00Z"));
        assert_eq!(range.end, utc("2024-01-20T21:59:59.999Z"));
    }

    #[test]
    fn today_follows_business_timezone() {
        // 23:30 UTC ya es el día siguiente en El Cairo.
        assert_eq!(today(utc("2024-01-15T23:30:00Z")), date("2024-01-16"));
        assert_eq!(today(utc("2024-01-15T21:30:00Z")), date("2024-01-15"));
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        assert!(parse_day("2024/01/15").is_err());
        assert!(parse_day("2024-02-30").is_err());
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("2024-1").is_err());
        assert!(parse_month("january").is_err());
    }

    #[test]
    fn resolve_range_prefers_date_then_month_then_today() {
        let now = utc("2024-03-05T10:00:00Z");
        let by_date = resolve_range(Some("2024-01-15"), Some("2024-02"), now).unwrap();
        assert_eq!(by_date, day_range(date("2024-01-15")));
        let by_month = resolve_range(None, Some("2024-02"), now).unwrap();
        assert_eq!(by_month, month_range(date("2024-02-01")));
        let default = resolve_range(Some(""), None, now).unwrap();
        assert_eq!(default, day_range(date("2024-03-05")));
    }

    #[test]
    fn elapsed_minutes_rounds_half_up() {
        let entry = utc("2024-01-15T10:00:00Z");
        assert_eq!(elapsed_minutes(entry, utc("2024-01-15T10:15:00Z")), 15);
        assert_eq!(elapsed_minutes(entry, utc("2024-01-15T10:14:30Z")), 15);
        assert_eq!(elapsed_minutes(entry, utc("2024-01-15T10:14:29.999Z")), 14);
        assert_eq!(elapsed_minutes(entry, entry), 0);
    }

    #[test]
    fn formats_in_business_timezone() {
        assert_eq!(
            format_business_datetime(utc("2024-01-15T08:05:09Z")),
            "2024-01-15 10:05:09"
        );
    }
}
