//! Modelo de Branch
//!
//! Entidad de referencia: las sucursales se usan para poblar
//! pickup/delivery de los parcels y para los joins de reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Branch - mapea exactamente a la tabla branch.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Branch {
    pub id: Uuid,
    pub branch_code: String,
    pub country: String,
    pub county: String,
    pub location: String,
    pub street_building: String,
    pub postal_code: Option<String>,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
}
