//! Controller de reportes
//!
//! Resuelve el tipo de reporte pedido (variante cerrada, nada de matchear
//! strings más abajo) y delega en ReportService.

use sqlx::PgPool;

use crate::dto::report_dto::{DashboardStats, Report, ReportRequest};
use crate::services::{ReportKind, ReportService};
use crate::utils::errors::AppError;

pub struct ReportController {
    reports: ReportService,
}

impl ReportController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            reports: ReportService::new(pool),
        }
    }

    pub async fn generate(
        &self,
        kind: &str,
        request: ReportRequest,
    ) -> Result<Report, AppError> {
        let kind = ReportKind::parse(kind).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unknown report type '{}' (expected parcels, staff or branches)",
                kind
            ))
        })?;

        if request.end_date < request.start_date {
            return Err(AppError::BadRequest(
                "endDate must not be before startDate".to_string(),
            ));
        }

        let report = match kind {
            ReportKind::Parcels => Report::Parcels(self.reports.parcel_report(&request).await?),
            ReportKind::Staff => Report::Staff(self.reports.staff_report(&request).await?),
            ReportKind::Branches => Report::Branches(self.reports.branch_report(&request).await?),
        };

        Ok(report)
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        self.reports.dashboard_stats().await
    }
}
