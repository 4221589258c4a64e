//! DTOs de Parcel
//!
//! Requests de registro, edición de detalles y cambio de estado, más la
//! vista pública de tracking que consume el cliente final.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Parcel, StatusHistoryEntry};

/// Request para registrar un nuevo parcel
#[derive(Debug, Deserialize, Validate)]
pub struct CreateParcelRequest {
    #[validate(length(min = 1, max = 200))]
    pub sender_name: String,

    #[validate(length(min = 1, max = 500))]
    pub sender_address: String,

    #[validate(email)]
    pub sender_email: Option<String>,

    #[validate(length(min = 7, max = 20))]
    pub sender_phone: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub recipient_name: String,

    #[validate(length(min = 1, max = 500))]
    pub recipient_address: String,

    #[validate(email)]
    pub recipient_email: Option<String>,

    #[validate(length(min = 7, max = 20))]
    pub recipient_phone: Option<String>,

    pub weight: f64,

    #[validate(custom = "crate::utils::validation::validate_delicacy")]
    pub delicacy: String,

    #[validate(custom = "crate::utils::validation::validate_size")]
    pub size: String,

    pub price: Option<Decimal>,

    pub pickup_branch_id: Option<Uuid>,
    pub delivery_branch_id: Option<Uuid>,
}

/// Request para editar detalles de un parcel (nunca el estado)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateParcelDetailsRequest {
    #[validate(length(min = 1, max = 200))]
    pub sender_name: Option<String>,

    #[validate(length(min = 1, max = 500))]
    pub sender_address: Option<String>,

    #[validate(email)]
    pub sender_email: Option<String>,

    #[validate(length(min = 7, max = 20))]
    pub sender_phone: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub recipient_name: Option<String>,

    #[validate(length(min = 1, max = 500))]
    pub recipient_address: Option<String>,

    #[validate(email)]
    pub recipient_email: Option<String>,

    #[validate(length(min = 7, max = 20))]
    pub recipient_phone: Option<String>,

    pub weight: Option<f64>,

    #[validate(custom = "crate::utils::validation::validate_delicacy")]
    pub delicacy: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_size")]
    pub size: Option<String>,

    pub price: Option<Decimal>,

    pub pickup_branch_id: Option<Uuid>,
    pub delivery_branch_id: Option<Uuid>,
}

/// Request para transicionar el estado de un parcel
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub location: Option<String>,
    pub comments: Option<String>,
}

/// Filtros del listado de parcels
#[derive(Debug, Deserialize)]
pub struct ParcelListQuery {
    pub status: Option<String>,
    pub branch_id: Option<Uuid>,
}

/// Filtros del listado paginado de administración
#[derive(Debug, Deserialize)]
pub struct AdminParcelQuery {
    pub page: Option<i64>,
    pub status: Option<String>,
    pub search: Option<String>,
}

/// Página del listado de administración
#[derive(Debug, Serialize)]
pub struct AdminParcelPage {
    pub parcels: Vec<crate::models::parcel::ParcelWithBranches>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

/// Un paso del historial en la vista pública de tracking
#[derive(Debug, Serialize)]
pub struct TrackingHistoryItem {
    pub status: String,
    pub location: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Vista pública de tracking: datos del parcel + historial descendente
#[derive(Debug, Serialize)]
pub struct TrackingResponse {
    pub tracking_number: String,
    pub status: String,
    pub sender_name: String,
    pub sender_address: String,
    pub sender_phone: Option<String>,
    pub recipient_name: String,
    pub recipient_address: String,
    pub recipient_phone: Option<String>,
    pub weight: f64,
    pub delicacy: String,
    pub pickup_branch_name: Option<String>,
    pub delivery_branch_name: Option<String>,
    pub tracking_history: Vec<TrackingHistoryItem>,
}

impl TrackingResponse {
    pub fn from_parts(
        parcel: Parcel,
        pickup_branch_name: Option<String>,
        delivery_branch_name: Option<String>,
        history: Vec<StatusHistoryEntry>,
    ) -> Self {
        let tracking_history = history
            .into_iter()
            .map(|entry| TrackingHistoryItem {
                description: entry
                    .comments
                    .clone()
                    .unwrap_or_else(|| format!("Parcel {}", entry.status)),
                location: entry.location.unwrap_or_else(|| "N/A".to_string()),
                status: entry.status,
                timestamp: entry.recorded_at,
            })
            .collect();

        Self {
            tracking_number: parcel.tracking_number,
            status: parcel.current_status,
            sender_name: parcel.sender_name,
            sender_address: parcel.sender_address,
            sender_phone: parcel.sender_phone,
            recipient_name: parcel.recipient_name,
            recipient_address: parcel.recipient_address,
            recipient_phone: parcel.recipient_phone,
            weight: parcel.weight,
            delicacy: parcel.delicacy,
            pickup_branch_name,
            delivery_branch_name,
            tracking_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateParcelRequest {
        CreateParcelRequest {
            sender_name: "Alice".to_string(),
            sender_address: "12 Riverside Drive".to_string(),
            sender_email: None,
            sender_phone: None,
            recipient_name: "Bob".to_string(),
            recipient_address: "3 Market Street".to_string(),
            recipient_email: None,
            recipient_phone: None,
            weight: 2.5,
            delicacy: "fragile".to_string(),
            size: "small".to_string(),
            price: None,
            pickup_branch_id: None,
            delivery_branch_id: None,
        }
    }

    #[test]
    fn valid_create_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn empty_sender_name_fails() {
        let mut request = valid_request();
        request.sender_name = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn unknown_size_fails() {
        let mut request = valid_request();
        request.size = "gigantic".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn unknown_delicacy_fails() {
        let mut request = valid_request();
        request.delicacy = "indestructible".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn malformed_email_fails() {
        let mut request = valid_request();
        request.sender_email = Some("not-an-email".to_string());
        assert!(request.validate().is_err());
    }
}
