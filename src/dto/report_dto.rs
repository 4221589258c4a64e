//! DTOs de reportes
//!
//! Filas crudas que devuelven las queries de agregación y los resúmenes
//! derivados que arma ReportService. El wire format del request conserva
//! camelCase (startDate/endDate/branchId) por compatibilidad con los
//! clientes existentes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Request de reporte: rango de fechas + filtros opcionales
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: Option<String>,
    pub branch_id: Option<Uuid>,
    pub region: Option<String>,
}

/// Conteo de parcels por estado
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

// ---------------------------------------------------------------------------
// Reporte de parcels
// ---------------------------------------------------------------------------

/// Fila cruda del reporte de parcels. `arrived_at` es el primer entry del
/// historial con el estado terminal, si el parcel llegó a tenerlo.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ParcelReportRow {
    pub tracking_number: String,
    pub sender_name: String,
    pub recipient_name: String,
    pub status: String,
    pub price: Decimal,
    pub pickup_location: Option<String>,
    pub delivery_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub arrived_at: Option<DateTime<Utc>>,
}

/// Resumen del reporte de parcels. Vacío == todo en cero, nunca error.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ParcelReportSummary {
    pub total_count: i64,
    /// Porcentaje de parcels cuyo estado actual es el terminal.
    pub success_rate: f64,
    /// Promedio de horas entre creación y primera llegada, solo sobre los
    /// parcels que llegaron a destino.
    pub avg_transit_hours: f64,
    pub total_revenue: f64,
    pub per_status_counts: Vec<StatusCount>,
}

impl ParcelReportSummary {
    pub fn zeroed() -> Self {
        Self {
            total_count: 0,
            success_rate: 0.0,
            avg_transit_hours: 0.0,
            total_revenue: 0.0,
            per_status_counts: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ParcelReport {
    pub summary: ParcelReportSummary,
    pub details: Vec<ParcelReportRow>,
}

// ---------------------------------------------------------------------------
// Reporte de staff
// ---------------------------------------------------------------------------

/// Fila cruda del reporte de staff: conteos por empleado dentro del rango.
#[derive(Debug, Clone, FromRow)]
pub struct StaffReportRow {
    pub employee_id: String,
    pub staff_name: String,
    pub email: String,
    pub branch_name: Option<String>,
    pub parcels_handled: i64,
    pub delivered_count: i64,
    pub join_date: DateTime<Utc>,
}

/// Fila del reporte de staff con su success rate ya derivado.
#[derive(Debug, Clone, Serialize)]
pub struct StaffReportEntry {
    pub employee_id: String,
    pub staff_name: String,
    pub email: String,
    pub branch_name: Option<String>,
    pub parcels_handled: i64,
    pub success_rate: f64,
    pub join_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StaffReportSummary {
    pub total_staff: i64,
    pub avg_parcels_per_staff: f64,
    pub most_active_branch: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StaffReport {
    pub summary: StaffReportSummary,
    pub details: Vec<StaffReportEntry>,
}

// ---------------------------------------------------------------------------
// Reporte de sucursales
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BranchReportRow {
    pub branch_code: String,
    pub location: String,
    pub staff_count: i64,
    pub parcel_count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BranchReportSummary {
    pub total_branches: i64,
    pub total_parcel_volume: i64,
    pub avg_staff_per_branch: f64,
}

#[derive(Debug, Serialize)]
pub struct BranchReport {
    pub summary: BranchReportSummary,
    pub details: Vec<BranchReportRow>,
}

/// Cualquier reporte, serializado con su propia forma.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report {
    Parcels(ParcelReport),
    Staff(StaffReport),
    Branches(BranchReport),
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_branches: i64,
    pub total_parcels: i64,
    pub total_staff: i64,
    pub parcel_status: Vec<StatusCount>,
}
