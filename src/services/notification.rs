//! Servicio de notificaciones (best-effort)
//!
//! Colaborador externo del motor de transiciones: avisa a remitente y
//! destinatario cuando se registra un parcel o cambia su estado. Se invoca
//! siempre DESPUÉS del commit y sus fallos se loguean, nunca se propagan:
//! una notificación caída jamás revierte una transición ya confirmada.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Aviso de parcel registrado
#[derive(Debug, Clone, Serialize)]
pub struct ParcelRegisteredNotice {
    pub tracking_number: String,
    pub status: String,
    pub sender_name: String,
    pub sender_email: Option<String>,
    pub recipient_name: String,
    pub recipient_email: Option<String>,
    pub weight: f64,
    pub delicacy: String,
    pub size: String,
    pub pickup_branch: Option<String>,
}

/// Aviso de cambio de estado
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdatedNotice {
    pub tracking_number: String,
    pub status: String,
    pub location: Option<String>,
    pub comments: Option<String>,
    pub sender_email: Option<String>,
    pub recipient_email: Option<String>,
}

/// Errores del canal de notificación. Siempre se capturan y loguean.
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook returned status {0}")]
    BadStatus(reqwest::StatusCode),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn parcel_registered(
        &self,
        notice: &ParcelRegisteredNotice,
    ) -> Result<(), NotificationError>;

    async fn status_updated(&self, notice: &StatusUpdatedNotice) -> Result<(), NotificationError>;
}

/// Notificador vía webhook HTTP: postea el aviso como JSON al endpoint
/// configurado (el gateway de emails vive detrás de ese endpoint).
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookNotifier {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    async fn post<T: Serialize>(&self, event: &str, notice: &T) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "event": event,
                "payload": notice,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotificationError::BadStatus(response.status()));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn parcel_registered(
        &self,
        notice: &ParcelRegisteredNotice,
    ) -> Result<(), NotificationError> {
        self.post("parcel_registered", notice).await
    }

    async fn status_updated(&self, notice: &StatusUpdatedNotice) -> Result<(), NotificationError> {
        self.post("status_updated", notice).await
    }
}

/// Notificador nulo para entornos sin webhook configurado.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn parcel_registered(
        &self,
        notice: &ParcelRegisteredNotice,
    ) -> Result<(), NotificationError> {
        log::debug!(
            "Notificación omitida (sin webhook): parcel {} registrado",
            notice.tracking_number
        );
        Ok(())
    }

    async fn status_updated(&self, notice: &StatusUpdatedNotice) -> Result<(), NotificationError> {
        log::debug!(
            "Notificación omitida (sin webhook): parcel {} -> {}",
            notice.tracking_number,
            notice.status
        );
        Ok(())
    }
}

/// Disparar el aviso de registro en background. El resultado de la
/// transición ya está comprometido cuando esto corre.
pub fn dispatch_parcel_registered(notifier: Arc<dyn Notifier>, notice: ParcelRegisteredNotice) {
    tokio::spawn(async move {
        if let Err(e) = notifier.parcel_registered(&notice).await {
            log::warn!(
                "Error enviando notificación de registro para {}: {}",
                notice.tracking_number,
                e
            );
        }
    });
}

/// Disparar el aviso de cambio de estado en background.
pub fn dispatch_status_updated(notifier: Arc<dyn Notifier>, notice: StatusUpdatedNotice) {
    tokio::spawn(async move {
        if let Err(e) = notifier.status_updated(&notice).await {
            log::warn!(
                "Error enviando notificación de estado para {} ({}): {}",
                notice.tracking_number,
                notice.status,
                e
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_notifier_always_succeeds() {
        let notifier = NoopNotifier;
        let notice = StatusUpdatedNotice {
            tracking_number: "DXTEST1".to_string(),
            status: "Shipped".to_string(),
            location: Some("Nairobi Hub".to_string()),
            comments: None,
            sender_email: None,
            recipient_email: None,
        };
        assert!(notifier.status_updated(&notice).await.is_ok());
    }

    #[test]
    fn registered_notice_serializes_contact_fields() {
        let notice = ParcelRegisteredNotice {
            tracking_number: "DXTEST1".to_string(),
            status: "Item Accepted by Courier".to_string(),
            sender_name: "Alice".to_string(),
            sender_email: Some("alice@example.com".to_string()),
            recipient_name: "Bob".to_string(),
            recipient_email: None,
            weight: 2.5,
            delicacy: "fragile".to_string(),
            size: "small".to_string(),
            pickup_branch: Some("Main Depot, Nakuru".to_string()),
        };

        let value = serde_json::to_value(&notice).unwrap();
        assert_eq!(value["tracking_number"], "DXTEST1");
        assert_eq!(value["sender_email"], "alice@example.com");
        assert!(value["recipient_email"].is_null());
    }
}
