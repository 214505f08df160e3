use sqlx::PgPool;
use tracing::debug;

use crate::dto::stats_dto::CustomerSearchQuery;
use crate::repositories::WashRecordRepository;
use crate::services::customer_lookup::{build_profile, plate_query, CustomerProfile, SEARCH_LIMIT};
use crate::utils::errors::AppResult;

pub struct CustomerController {
    records: WashRecordRepository,
}

impl CustomerController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            records: WashRecordRepository::new(pool),
        }
    }

    /// `None` cuando la consulta es muy corta o no hay visitas.
    pub async fn search(&self, query: CustomerSearchQuery) -> AppResult<Option<CustomerProfile>> {
        let Some(plate) = query.plate.as_deref().and_then(plate_query) else {
            return Ok(None);
        };
        let visits = self.records.search_by_plate(&plate, SEARCH_LIMIT).await?;
        debug!("Customer search '{}' matched {} visits", plate.western, visits.len());
        Ok(build_profile(&plate, &visits))
    }
}
