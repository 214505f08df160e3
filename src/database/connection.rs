//! Conexión a PostgreSQL y migraciones

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::database::DatabaseConfig;

/// Crear el pool y verificar que la base responde
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    info!("🗄️  Conectando a {}", mask_database_url(&config.url));
    let pool = config
        .create_pool()
        .await
        .context("could not connect to PostgreSQL")?;
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("PostgreSQL did not answer the health query")?;
    Ok(pool)
}

/// Ejecutar las migraciones de `migrations/`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("database migrations failed")?;
    info!("✅ Migraciones aplicadas");
    Ok(())
}

/// Enmascara usuario y contraseña de la URL para los logs
pub fn mask_database_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at_pos)) if at_pos > scheme_end => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
