//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Todas tienen un valor por defecto salvo `ADMIN_PASSWORD`: sin ella nadie
//! puede iniciar sesión.

use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    /// Contraseña compartida del panel; `None` bloquea todo login.
    pub admin_password: Option<String>,
    pub session_ttl_hours: i64,
    pub cors_origins: Vec<String>,
    /// Destino opcional del aviso de "auto listo".
    pub notify_webhook_url: Option<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            admin_password: None,
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            cors_origins: vec!["http://localhost:3000".to_string()],
            notify_webhook_url: None,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl EnvironmentConfig {
    /// Leer la configuración desde el entorno (después de `dotenvy`)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = match non_empty_var("PORT") {
            Some(p) => p.parse().with_context(|| format!("PORT must be a valid number, got '{}'", p))?,
            None => defaults.port,
        };
        let session_ttl_hours = match non_empty_var("SESSION_TTL_HOURS") {
            Some(h) => h
                .parse()
                .with_context(|| format!("SESSION_TTL_HOURS must be a valid number, got '{}'", h))?,
            None => defaults.session_ttl_hours,
        };
        let cors_origins = non_empty_var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        Ok(Self {
            environment: non_empty_var("ENVIRONMENT").unwrap_or(defaults.environment),
            port,
            host: non_empty_var("HOST").unwrap_or(defaults.host),
            admin_password: non_empty_var("ADMIN_PASSWORD"),
            session_ttl_hours,
            cors_origins,
            notify_webhook_url: non_empty_var("NOTIFY_WEBHOOK_URL"),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
