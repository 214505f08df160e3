//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: pool, configuración, sesiones en memoria
//! y el notificador de lavados terminados.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Client;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::environment::EnvironmentConfig;
use crate::services::notification_service::{FinishNotifier, WhatsAppLinkNotifier};

const SESSION_TOKEN_LEN: usize = 48;

/// Sesión abierta con la contraseña compartida
#[derive(Clone, Debug)]
pub struct SessionToken {
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(token: String, expires_in_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            token,
            created_at: now,
            expires_at: now + Duration::hours(expires_in_hours),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub sessions: Arc<RwLock<HashMap<String, SessionToken>>>,
    pub notifier: Arc<dyn FinishNotifier>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let notifier = WhatsAppLinkNotifier::new(Client::new(), config.notify_webhook_url.clone());
        Self::with_notifier(pool, config, Arc::new(notifier))
    }

    pub fn with_notifier(
        pool: PgPool,
        config: EnvironmentConfig,
        notifier: Arc<dyn FinishNotifier>,
    ) -> Self {
        Self {
            pool,
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            notifier,
        }
    }

    /// Abrir una sesión nueva con un token aleatorio
    pub async fn create_session(&self) -> SessionToken {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_TOKEN_LEN)
            .map(char::from)
            .collect();
        let session = SessionToken::new(token.clone(), self.config.session_ttl_hours);

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.is_expired());
        sessions.insert(token, session.clone());
        debug!("Session opened, {} active", sessions.len());
        session
    }

    /// ¿El token corresponde a una sesión viva?
    pub async fn is_session_valid(&self, token: &str) -> bool {
        let sessions = self.sessions.read().await;
        sessions.get(token).is_some_and(|s| !s.is_expired())
    }

    /// Cerrar una sesión; devuelve si existía
    pub async fn revoke_session(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Limpiar sesiones expiradas
    pub async fn cleanup_expired_sessions(&self) {
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.is_expired());
    }
}
