//! Rutas de reportes y dashboard

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::report_controller::ReportController;
use crate::dto::report_dto::{DashboardStats, Report, ReportRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_report_router() -> Router<AppState> {
    Router::new().route("/:kind", post(generate_report))
}

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new().route("/stats", get(dashboard_stats))
}

async fn generate_report(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<Report>, AppError> {
    let controller = ReportController::new(state.pool.clone());
    let response = controller.generate(&kind, request).await?;
    Ok(Json(response))
}

async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let controller = ReportController::new(state.pool.clone());
    let response = controller.dashboard_stats().await?;
    Ok(Json(response))
}
