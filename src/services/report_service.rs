//! Motor de agregación y reportes
//!
//! Vistas derivadas de solo lectura sobre parcels + historial + sucursales
//! + staff. No toma locks ni muta nada: cada reporte es una foto del
//! estado en el momento de la consulta. Los resúmenes se calculan en Rust
//! sobre las filas ya traídas, así la aritmética queda testeable sin base
//! de datos; un resultado vacío produce un resumen en cero, nunca error.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::BTreeMap;

use crate::dto::report_dto::{
    BranchReport, BranchReportRow, BranchReportSummary, DashboardStats, ParcelReport,
    ParcelReportRow, ParcelReportSummary, ReportRequest, StaffReport, StaffReportEntry,
    StaffReportRow, StaffReportSummary, StatusCount,
};
use crate::models::ParcelStatus;
use crate::utils::errors::AppError;

/// Tipo de reporte. Cerrado: la ruta recibe un string y lo parsea acá,
/// un valor desconocido es BadRequest antes de tocar la base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Parcels,
    Staff,
    Branches,
}

impl ReportKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "parcels" => Some(ReportKind::Parcels),
            "staff" => Some(ReportKind::Staff),
            "branches" => Some(ReportKind::Branches),
            _ => None,
        }
    }
}

pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reporte de parcels dentro del rango, con filtros opcionales de
    /// estado y sucursal. `arrived_at` por fila es el PRIMER entry del
    /// historial con el estado terminal.
    pub async fn parcel_report(&self, request: &ReportRequest) -> Result<ParcelReport, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT
                p.tracking_number,
                p.sender_name,
                p.recipient_name,
                p.current_status AS status,
                p.price,
                pb.street_building AS pickup_location,
                db.street_building AS delivery_location,
                p.created_at,
                MIN(h.recorded_at) FILTER (WHERE h.status = "#,
        );
        query.push_bind(ParcelStatus::ArrivedAtDestination.as_str());
        query.push(
            r#") AS arrived_at
            FROM parcel p
            LEFT JOIN branch pb ON p.pickup_branch_id = pb.id
            LEFT JOIN branch db ON p.delivery_branch_id = db.id
            LEFT JOIN parcel_status_history h ON h.parcel_id = p.id
            WHERE p.created_at BETWEEN "#,
        );
        query.push_bind(request.start_date);
        query.push(" AND ");
        query.push_bind(request.end_date);

        if let Some(status) = &request.status {
            query.push(" AND p.current_status = ").push_bind(status);
        }
        if let Some(branch_id) = request.branch_id {
            query
                .push(" AND (p.pickup_branch_id = ")
                .push_bind(branch_id)
                .push(" OR p.delivery_branch_id = ")
                .push_bind(branch_id)
                .push(")");
        }

        query.push(
            r#"
            GROUP BY p.id, pb.street_building, db.street_building
            ORDER BY p.created_at DESC
            "#,
        );

        let details = query
            .build_query_as::<ParcelReportRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(ParcelReport {
            summary: summarize_parcels(&details),
            details,
        })
    }

    /// Reporte por staff: parcels de su sucursal (pickup o delivery)
    /// creados dentro del rango.
    pub async fn staff_report(&self, request: &ReportRequest) -> Result<StaffReport, AppError> {
        let rows = sqlx::query_as::<_, StaffReportRow>(
            r#"
            SELECT
                s.employee_id,
                s.first_name || ' ' || s.last_name AS staff_name,
                s.email,
                b.street_building AS branch_name,
                COUNT(DISTINCT p.id) AS parcels_handled,
                COUNT(DISTINCT p.id) FILTER (WHERE p.current_status = $3) AS delivered_count,
                s.created_at AS join_date
            FROM staff s
            LEFT JOIN branch b ON s.branch_id = b.id
            LEFT JOIN parcel p ON (
                (p.pickup_branch_id = s.branch_id OR p.delivery_branch_id = s.branch_id)
                AND p.created_at BETWEEN $1 AND $2
            )
            GROUP BY s.id, b.street_building
            ORDER BY parcels_handled DESC
            "#,
        )
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(ParcelStatus::ArrivedAtDestination.as_str())
        .fetch_all(&self.pool)
        .await?;

        let (details, summary) = summarize_staff(rows);
        Ok(StaffReport { summary, details })
    }

    /// Reporte por sucursal: tamaño de plantilla y volumen de parcels
    /// dentro del rango, con filtro opcional de región.
    pub async fn branch_report(&self, request: &ReportRequest) -> Result<BranchReport, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT
                b.branch_code,
                b.street_building || ', ' || b.location AS location,
                COUNT(DISTINCT s.id) AS staff_count,
                COUNT(DISTINCT p.id) AS parcel_count
            FROM branch b
            LEFT JOIN staff s ON s.branch_id = b.id
            LEFT JOIN parcel p ON (
                (p.pickup_branch_id = b.id OR p.delivery_branch_id = b.id)
                AND p.created_at BETWEEN "#,
        );
        query.push_bind(request.start_date);
        query.push(" AND ");
        query.push_bind(request.end_date);
        query.push(") WHERE 1=1");

        if let Some(region) = &request.region {
            let pattern = format!("%{}%", region);
            query
                .push(" AND (b.county ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR b.location ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        query.push(" GROUP BY b.id ORDER BY parcel_count DESC");

        let details = query
            .build_query_as::<BranchReportRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(BranchReport {
            summary: summarize_branches(&details),
            details,
        })
    }

    /// Totales del dashboard de administración.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        let total_branches: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM branch")
            .fetch_one(&self.pool)
            .await?;
        let total_parcels: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM parcel")
            .fetch_one(&self.pool)
            .await?;
        let total_staff: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff")
            .fetch_one(&self.pool)
            .await?;

        let parcel_status = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT current_status AS status, COUNT(*) AS count
            FROM parcel
            GROUP BY current_status
            ORDER BY count DESC, status
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_branches,
            total_parcels,
            total_staff,
            parcel_status,
        })
    }
}

/// Resumen del reporte de parcels. Success = fracción cuyo estado actual
/// es el terminal; el tiempo de tránsito promedia SOLO los parcels que
/// llegaron (los que no llegaron quedan fuera del promedio, no cuentan
/// como cero).
pub fn summarize_parcels(rows: &[ParcelReportRow]) -> ParcelReportSummary {
    if rows.is_empty() {
        return ParcelReportSummary::zeroed();
    }

    let total_count = rows.len() as i64;
    let terminal = ParcelStatus::ArrivedAtDestination.as_str();

    let delivered = rows.iter().filter(|r| r.status == terminal).count();
    let success_rate = delivered as f64 * 100.0 / total_count as f64;

    let transit_hours: Vec<f64> = rows
        .iter()
        .filter_map(|r| {
            r.arrived_at
                .map(|arrived| (arrived - r.created_at).num_seconds() as f64 / 3600.0)
        })
        .collect();
    let avg_transit_hours = if transit_hours.is_empty() {
        0.0
    } else {
        transit_hours.iter().sum::<f64>() / transit_hours.len() as f64
    };

    let total_revenue = rows
        .iter()
        .map(|r| r.price)
        .sum::<Decimal>()
        .to_f64()
        .unwrap_or(0.0);

    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.status.as_str()).or_insert(0) += 1;
    }
    let per_status_counts = counts
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_string(),
            count,
        })
        .collect();

    ParcelReportSummary {
        total_count,
        success_rate,
        avg_transit_hours,
        total_revenue,
        per_status_counts,
    }
}

/// Derivar el success rate por staff y el resumen global.
pub fn summarize_staff(rows: Vec<StaffReportRow>) -> (Vec<StaffReportEntry>, StaffReportSummary) {
    let total_staff = rows.len() as i64;

    let mut branch_activity: BTreeMap<String, i64> = BTreeMap::new();
    let mut handled_total = 0i64;

    let details: Vec<StaffReportEntry> = rows
        .into_iter()
        .map(|row| {
            handled_total += row.parcels_handled;
            if let Some(branch) = &row.branch_name {
                *branch_activity.entry(branch.clone()).or_insert(0) += row.parcels_handled;
            }

            let success_rate = if row.parcels_handled > 0 {
                row.delivered_count as f64 * 100.0 / row.parcels_handled as f64
            } else {
                0.0
            };

            StaffReportEntry {
                employee_id: row.employee_id,
                staff_name: row.staff_name,
                email: row.email,
                branch_name: row.branch_name,
                parcels_handled: row.parcels_handled,
                success_rate,
                join_date: row.join_date,
            }
        })
        .collect();

    let avg_parcels_per_staff = if total_staff > 0 {
        handled_total as f64 / total_staff as f64
    } else {
        0.0
    };

    let most_active_branch = branch_activity
        .into_iter()
        .max_by_key(|(_, handled)| *handled)
        .map(|(branch, _)| branch);

    (
        details,
        StaffReportSummary {
            total_staff,
            avg_parcels_per_staff,
            most_active_branch,
        },
    )
}

/// Resumen del reporte de sucursales.
pub fn summarize_branches(rows: &[BranchReportRow]) -> BranchReportSummary {
    let total_branches = rows.len() as i64;
    let total_parcel_volume = rows.iter().map(|r| r.parcel_count).sum();
    let avg_staff_per_branch = if total_branches > 0 {
        rows.iter().map(|r| r.staff_count).sum::<i64>() as f64 / total_branches as f64
    } else {
        0.0
    };

    BranchReportSummary {
        total_branches,
        total_parcel_volume,
        avg_staff_per_branch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn row(status: &str, transit: Option<Duration>, price: i64) -> ParcelReportRow {
        let created_at = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        ParcelReportRow {
            tracking_number: "DXTEST".to_string(),
            sender_name: "Alice".to_string(),
            recipient_name: "Bob".to_string(),
            status: status.to_string(),
            price: Decimal::from(price),
            pickup_location: None,
            delivery_location: None,
            created_at,
            arrived_at: transit.map(|d| created_at + d),
        }
    }

    #[test]
    fn report_kind_parses_known_values_only() {
        assert_eq!(ReportKind::parse("parcels"), Some(ReportKind::Parcels));
        assert_eq!(ReportKind::parse("staff"), Some(ReportKind::Staff));
        assert_eq!(ReportKind::parse("branches"), Some(ReportKind::Branches));
        assert_eq!(ReportKind::parse("revenue"), None);
    }

    #[test]
    fn empty_rows_produce_zeroed_summary() {
        assert_eq!(summarize_parcels(&[]), ParcelReportSummary::zeroed());
    }

    #[test]
    fn one_of_three_arrived_gives_a_third_success_rate() {
        // Tres parcels, uno llegó a destino en 48 horas: success 33.3% y
        // el promedio de tránsito sale SOLO de ese parcel.
        let rows = vec![
            row("Arrived At Destination", Some(Duration::hours(48)), 100),
            row("Shipped", None, 50),
            row("In-Transit", None, 50),
        ];

        let summary = summarize_parcels(&rows);
        assert_eq!(summary.total_count, 3);
        assert!((summary.success_rate - 33.333333).abs() < 0.001);
        assert!((summary.avg_transit_hours - 48.0).abs() < f64::EPSILON);
        assert!((summary.total_revenue - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parcels_that_never_arrived_do_not_drag_the_average() {
        let rows = vec![
            row("Arrived At Destination", Some(Duration::hours(24)), 0),
            row("Arrived At Destination", Some(Duration::hours(72)), 0),
            row("Collected", None, 0),
        ];

        let summary = summarize_parcels(&rows);
        assert!((summary.avg_transit_hours - 48.0).abs() < f64::EPSILON);
    }

    #[test]
    fn per_status_counts_cover_every_row() {
        let rows = vec![
            row("Shipped", None, 0),
            row("Shipped", None, 0),
            row("Collected", None, 0),
        ];

        let summary = summarize_parcels(&rows);
        let total: i64 = summary.per_status_counts.iter().map(|c| c.count).sum();
        assert_eq!(total, 3);
        assert!(summary
            .per_status_counts
            .iter()
            .any(|c| c.status == "Shipped" && c.count == 2));
    }

    fn staff_row(name: &str, branch: Option<&str>, handled: i64, delivered: i64) -> StaffReportRow {
        StaffReportRow {
            employee_id: format!("EMP{}", name),
            staff_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            branch_name: branch.map(|b| b.to_string()),
            parcels_handled: handled,
            delivered_count: delivered,
            join_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn staff_with_no_parcels_has_zero_success_rate() {
        let (details, summary) = summarize_staff(vec![staff_row("Idle", None, 0, 0)]);
        assert_eq!(details[0].success_rate, 0.0);
        assert_eq!(summary.total_staff, 1);
        assert_eq!(summary.most_active_branch, None);
    }

    #[test]
    fn most_active_branch_wins_by_handled_volume() {
        let (details, summary) = summarize_staff(vec![
            staff_row("Ann", Some("Depot A"), 10, 5),
            staff_row("Ben", Some("Depot B"), 4, 4),
        ]);

        assert!((details[0].success_rate - 50.0).abs() < f64::EPSILON);
        assert!((details[1].success_rate - 100.0).abs() < f64::EPSILON);
        assert_eq!(summary.most_active_branch.as_deref(), Some("Depot A"));
        assert!((summary.avg_parcels_per_staff - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn branch_summary_averages_staff_counts() {
        let rows = vec![
            BranchReportRow {
                branch_code: "BR1".to_string(),
                location: "Main, Nakuru".to_string(),
                staff_count: 3,
                parcel_count: 12,
            },
            BranchReportRow {
                branch_code: "BR2".to_string(),
                location: "Annex, Eldoret".to_string(),
                staff_count: 1,
                parcel_count: 4,
            },
        ];

        let summary = summarize_branches(&rows);
        assert_eq!(summary.total_branches, 2);
        assert_eq!(summary.total_parcel_volume, 16);
        assert!((summary.avg_staff_per_branch - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_branch_rows_summarize_to_zero() {
        let summary = summarize_branches(&[]);
        assert_eq!(summary.total_branches, 0);
        assert_eq!(summary.total_parcel_volume, 0);
        assert_eq!(summary.avg_staff_per_branch, 0.0);
    }
}
