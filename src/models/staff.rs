//! Modelo de Staff
//!
//! Entidad de referencia consumida por los joins de reporting
//! (un staff "maneja" los parcels de su sucursal).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Staff - mapea exactamente a la tabla staff.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Staff {
    pub id: Uuid,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub branch_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Staff con el nombre de su sucursal, para listados.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StaffWithBranch {
    pub id: Uuid,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub branch_id: Option<Uuid>,
    pub branch_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
