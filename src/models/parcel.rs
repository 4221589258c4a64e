//! Modelo de Parcel
//!
//! Este módulo contiene el struct Parcel, el vocabulario de estados
//! (ParcelStatus) y las entradas del historial de estados.
//! Mapea exactamente al schema PostgreSQL.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vocabulario cerrado de estados de un parcel.
///
/// `Arrived At Destination` es el estado terminal canónico. Un schema
/// anterior usaba además la etiqueta `Delivered` de forma inconsistente;
/// esa etiqueta no forma parte del vocabulario y se rechaza al parsear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParcelStatus {
    ItemAccepted,
    Collected,
    Shipped,
    InTransit,
    OutForDelivery,
    ArrivedAtDestination,
}

impl ParcelStatus {
    /// Todos los estados válidos, en orden convencional de avance.
    pub const ALL: [ParcelStatus; 6] = [
        ParcelStatus::ItemAccepted,
        ParcelStatus::Collected,
        ParcelStatus::Shipped,
        ParcelStatus::InTransit,
        ParcelStatus::OutForDelivery,
        ParcelStatus::ArrivedAtDestination,
    ];

    /// Estado inicial de todo parcel recién registrado.
    pub fn initial() -> Self {
        ParcelStatus::ItemAccepted
    }

    /// Representación canónica tal como se persiste y se expone en la API.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParcelStatus::ItemAccepted => "Item Accepted by Courier",
            ParcelStatus::Collected => "Collected",
            ParcelStatus::Shipped => "Shipped",
            ParcelStatus::InTransit => "In-Transit",
            ParcelStatus::OutForDelivery => "Out for Delivery",
            ParcelStatus::ArrivedAtDestination => "Arrived At Destination",
        }
    }

    /// Parsear un estado recibido por la API. Match exacto, sin alias.
    pub fn parse(value: &str) -> Option<Self> {
        ParcelStatus::ALL
            .iter()
            .copied()
            .find(|s| s.as_str() == value)
    }

    /// Estado terminal por convención. No se aplica de forma mecánica:
    /// el motor de transiciones acepta cualquier estado después de cualquier
    /// otro (gap conocido, ver TransitionService).
    pub fn is_terminal(&self) -> bool {
        matches!(self, ParcelStatus::ArrivedAtDestination)
    }
}

impl std::fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parcel principal - mapea exactamente a la tabla parcel.
///
/// `current_status` es una copia desnormalizada del último entry del
/// historial; solo TransitionService lo escribe, siempre dentro de la misma
/// transacción que el append al historial.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Parcel {
    pub id: Uuid,
    pub tracking_number: String,
    pub sender_name: String,
    pub sender_address: String,
    pub sender_email: Option<String>,
    pub sender_phone: Option<String>,
    pub recipient_name: String,
    pub recipient_address: String,
    pub recipient_email: Option<String>,
    pub recipient_phone: Option<String>,
    pub weight: f64,
    pub delicacy: String,
    pub size: String,
    pub price: Decimal,
    pub current_status: String,
    pub pickup_branch_id: Option<Uuid>,
    pub delivery_branch_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Parcel con los nombres de sus sucursales, para listados y tracking.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ParcelWithBranches {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub parcel: Parcel,
    pub pickup_branch_name: Option<String>,
    pub delivery_branch_name: Option<String>,
}

/// Una entrada inmutable del historial: "en el momento T el parcel P
/// estaba en el estado S". El `id` BIGSERIAL desempata entries que
/// comparten `recorded_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StatusHistoryEntry {
    pub id: i64,
    pub parcel_id: Uuid,
    pub status: String,
    pub location: Option<String>,
    pub comments: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
