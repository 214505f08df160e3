//! Aviso de "auto listo" al terminar un lavado
//!
//! Al terminar un lavado con teléfono se arma el enlace de WhatsApp para
//! el cliente. Si hay `NOTIFY_WEBHOOK_URL` se publica ahí; si no, sólo se
//! registra en el log. Corre en segundo plano y sus fallos nunca llegan
//! al cliente HTTP.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const READY_MESSAGE: &str =
    "Hello! Your car is ready for pickup. Thank you for choosing VRoom CarWash!";

/// Datos del lavado terminado que necesita el aviso.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishNotice {
    pub record_id: Uuid,
    pub plate_number: String,
    pub phone_number: String,
}

#[async_trait]
pub trait FinishNotifier: Send + Sync {
    async fn car_ready(&self, notice: &FinishNotice) -> Result<()>;
}

/// Número egipcio en formato internacional sin `+` (p. ej. `201012345678`).
pub fn format_egyptian_phone(raw: &str) -> Option<String> {
    let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    if digits.starts_with('0') {
        digits.insert(0, '2');
    }
    if !digits.starts_with("20") {
        digits.insert_str(0, "20");
    }
    Some(digits)
}

pub fn whatsapp_link(phone: &str, message: &str) -> String {
    format!("https://wa.me/{}?text={}", phone, urlencoding::encode(message))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookPayload<'a> {
    record_id: Uuid,
    plate_number: &'a str,
    phone_number: &'a str,
    whatsapp_url: &'a str,
    message: &'a str,
}

/// Implementación por defecto: enlace wa.me y webhook opcional.
#[derive(Clone)]
pub struct WhatsAppLinkNotifier {
    client: Client,
    webhook_url: Option<String>,
}

impl WhatsAppLinkNotifier {
    pub fn new(client: Client, webhook_url: Option<String>) -> Self {
        Self {
            client,
            webhook_url,
        }
    }
}

#[async_trait]
impl FinishNotifier for WhatsAppLinkNotifier {
    async fn car_ready(&self, notice: &FinishNotice) -> Result<()> {
        let Some(phone) = format_egyptian_phone(&notice.phone_number) else {
            debug!("Record {} has no usable phone number", notice.record_id);
            return Ok(());
        };
        let url = whatsapp_link(&phone, READY_MESSAGE);
        info!("📲 Car {} ready, notify {}", notice.plate_number, url);

        let Some(webhook) = &self.webhook_url else {
            return Ok(());
        };
        let payload = WebhookPayload {
            record_id: notice.record_id,
            plate_number: &notice.plate_number,
            phone_number: &phone,
            whatsapp_url: &url,
            message: READY_MESSAGE,
        };
        self.client
            .post(webhook)
            .json(&payload)
            .send()
            .await
            .context("notification webhook unreachable")?
            .error_for_status()
            .context("notification webhook rejected the request")?;
        Ok(())
    }
}

/// Dispara el aviso sin bloquear la respuesta.
pub fn spawn_finish_notification(notifier: Arc<dyn FinishNotifier>, notice: FinishNotice) {
    tokio::spawn(async move {
        if let Err(e) = notifier.car_ready(&notice).await {
            warn!("Finish notification for {} failed: {:#}", notice.record_id, e);
        }
    });
}
