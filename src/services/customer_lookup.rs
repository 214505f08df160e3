//! Búsqueda de clientes por placa
//!
//! Autocompletado durante la recepción: a partir de las últimas visitas
//! que contienen la placa buscada arma el perfil del cliente.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::wash_record::{WashRecord, WashStatus, WashType};
use crate::utils::plate::{search_key, to_arabic_digits};

/// Consultas más cortas no buscan nada.
pub const MIN_QUERY_CHARS: usize = 2;
/// Visitas que se leen de la base para armar el perfil.
pub const SEARCH_LIMIT: i64 = 20;
pub const RECENT_VISITS: usize = 5;
pub const VIP_VISITS: usize = 5;

/// Formas de la consulta que se buscan dentro de las placas guardadas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateQuery {
    pub western: String,
    pub arabic: String,
}

/// `None` si la consulta es demasiado corta.
pub fn plate_query(raw: &str) -> Option<PlateQuery> {
    let western = search_key(raw);
    if western.chars().count() < MIN_QUERY_CHARS {
        return None;
    }
    let arabic = to_arabic_digits(&western);
    Some(PlateQuery { western, arabic })
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerVisit {
    pub id: Uuid,
    pub plate_number: String,
    pub car_type: Option<String>,
    pub phone_number: Option<String>,
    pub wash_type: WashType,
    pub amount_paid: Decimal,
    pub entry_time: DateTime<Utc>,
    pub status: WashStatus,
}

impl From<&WashRecord> for CustomerVisit {
    fn from(record: &WashRecord) -> Self {
        Self {
            id: record.id,
            plate_number: record.plate_number.clone(),
            car_type: record.car_type.clone(),
            phone_number: record.phone_number.clone(),
            wash_type: record.wash_type,
            amount_paid: record.amount_paid,
            entry_time: record.entry_time,
            status: record.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    pub plate_number: String,
    pub car_type: Option<String>,
    pub phone_number: Option<String>,
    pub total_visits: usize,
    pub total_spent: Decimal,
    pub last_visit: DateTime<Utc>,
    pub favorite_wash_type: WashType,
    #[serde(rename = "isVIP")]
    pub is_vip: bool,
    pub recent_visits: Vec<CustomerVisit>,
}

/// Arma el perfil a partir de visitas ordenadas de la más reciente a la
/// más antigua. Se agrupa por placa guardada; gana el grupo cuya placa
/// normalizada coincide con la consulta y, si no hay, el de la visita
/// más reciente.
pub fn build_profile(query: &PlateQuery, visits: &[WashRecord]) -> Option<CustomerProfile> {
    let mut groups: Vec<(&str, Vec<&WashRecord>)> = Vec::new();
    for visit in visits {
        match groups
            .iter_mut()
            .find(|(plate, _)| *plate == visit.plate_number.as_str())
        {
            Some((_, group)) => group.push(visit),
            None => groups.push((visit.plate_number.as_str(), vec![visit])),
        }
    }

    let (plate, group) = groups
        .iter()
        .find(|(plate, _)| search_key(plate) == query.western)
        .or_else(|| groups.first())?;
    let last = group.first()?;

    Some(CustomerProfile {
        plate_number: plate.to_string(),
        car_type: last.car_type.clone(),
        phone_number: last.phone_number.clone(),
        total_visits: group.len(),
        total_spent: group.iter().map(|r| r.amount_paid).sum(),
        last_visit: last.entry_time,
        favorite_wash_type: favorite_wash_type(group),
        is_vip: group.len() >= VIP_VISITS,
        recent_visits: group
            .iter()
            .take(RECENT_VISITS)
            .map(|r| CustomerVisit::from(*r))
            .collect(),
    })
}

/// El tipo más frecuente; en empate, el que aparece primero.
fn favorite_wash_type(group: &[&WashRecord]) -> WashType {
    let mut counts: Vec<(WashType, usize)> = Vec::new();
    for record in group {
        match counts.iter_mut().find(|(t, _)| *t == record.wash_type) {
            Some((_, n)) => *n += 1,
            None => counts.push((record.wash_type, 1)),
        }
    }
    let mut best: Option<(WashType, usize)> = None;
    for (wash_type, count) in counts {
        if best.map_or(true, |(_, n)| count > n) {
            best = Some((wash_type, count));
        }
    }
    best.map(|(t, _)| t).unwrap_or(WashType::Outer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn visit(plate: &str, wash_type: WashType, amount: i64, hours_ago: i64) -> WashRecord {
        let at = Utc::now() - Duration::hours(hours_ago);
        WashRecord {
            id: Uuid::new_v4(),
            plate_number: plate.into(),
            car_type: Some(format!("car-{}", hours_ago)),
            phone_number: None,
            wash_type,
            payment_type: None,
            amount_paid: Decimal::from(amount),
            tip_amount: Decimal::ZERO,
            payment_received: false,
            instapay_proof: None,
            worker_id: None,
            status: WashStatus::Finished,
            entry_time: at,
            finish_time: None,
            elapsed_minutes: None,
            notes: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_short_queries_are_ignored() {
        assert!(plate_query("a").is_none());
        assert!(plate_query(" ١ ").is_none());
        assert!(plate_query("ab").is_some());
    }

    #[test]
    fn test_query_renders_both_numeral_systems() {
        let q = plate_query("abc١٢٣٤").unwrap();
        assert_eq!(q.western, "ABC1234");
        assert_eq!(q.arabic, "ABC١٢٣٤");
    }

    #[test]
    fn test_exact_plate_group_wins() {
        let visits = vec![
            visit("ABC12345", WashType::Full, 170, 1),
            visit("ABC1234", WashType::Outer, 90, 2),
            visit("ABC1234", WashType::Outer, 90, 3),
        ];
        let profile = build_profile(&plate_query("abc1234").unwrap(), &visits).unwrap();
        assert_eq!(profile.plate_number, "ABC1234");
        assert_eq!(profile.total_visits, 2);
        assert_eq!(profile.total_spent, Decimal::from(180));
        assert_eq!(profile.car_type.as_deref(), Some("car-2"));
    }

    #[test]
    fn test_arabic_stored_plate_matches_western_query() {
        let visits = vec![visit("ABC١٢٣٤", WashType::Inner, 90, 1)];
        let profile = build_profile(&plate_query("ABC1234").unwrap(), &visits).unwrap();
        assert_eq!(profile.plate_number, "ABC١٢٣٤");
    }

    #[test]
    fn test_falls_back_to_most_recent_group() {
        let visits = vec![
            visit("XAB99", WashType::Inner, 90, 1),
            visit("AB77", WashType::Full, 170, 2),
        ];
        let profile = build_profile(&plate_query("ab").unwrap(), &visits).unwrap();
        assert_eq!(profile.plate_number, "XAB99");
    }

    #[test]
    fn test_vip_threshold() {
        let four: Vec<_> = (1..=4).map(|h| visit("VIP1", WashType::Outer, 90, h)).collect();
        let q = plate_query("VIP1").unwrap();
        assert!(!build_profile(&q, &four).unwrap().is_vip);

        let five: Vec<_> = (1..=5).map(|h| visit("VIP1", WashType::Outer, 90, h)).collect();
        let profile = build_profile(&q, &five).unwrap();
        assert!(profile.is_vip);
        assert_eq!(profile.recent_visits.len(), 5);
    }

    #[test]
    fn test_favorite_ties_go_to_first_seen() {
        let visits = vec![
            visit("TIE1", WashType::Full, 170, 1),
            visit("TIE1", WashType::Inner, 90, 2),
            visit("TIE1", WashType::Inner, 90, 3),
            visit("TIE1", WashType::Full, 170, 4),
        ];
        let profile = build_profile(&plate_query("TIE1").unwrap(), &visits).unwrap();
        assert_eq!(profile.favorite_wash_type, WashType::Full);
    }

    #[test]
    fn test_no_visits_no_profile() {
        assert!(build_profile(&plate_query("NONE").unwrap(), &[]).is_none());
    }
}
