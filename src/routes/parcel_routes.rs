//! Rutas de parcels

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::controllers::parcel_controller::ParcelController;
use crate::dto::parcel_dto::{
    AdminParcelPage, AdminParcelQuery, CreateParcelRequest, ParcelListQuery, TrackingResponse,
    UpdateParcelDetailsRequest, UpdateStatusRequest,
};
use crate::dto::ApiResponse;
use crate::models::{Parcel, ParcelWithBranches, StatusHistoryEntry};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_parcel_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_parcel))
        .route("/", get(list_parcels))
        .route("/admin", get(admin_list_parcels))
        .route("/:tracking", get(get_parcel))
        .route("/:tracking/details", put(update_parcel_details))
        .route("/:tracking/status", put(update_parcel_status))
        .route("/:tracking/history", get(get_parcel_history))
}

/// Router separado para la vista pública de tracking del cliente final.
pub fn create_tracking_router() -> Router<AppState> {
    Router::new().route("/:tracking", get(track_parcel))
}

async fn register_parcel(
    State(state): State<AppState>,
    Json(request): Json<CreateParcelRequest>,
) -> Result<Json<ApiResponse<Parcel>>, AppError> {
    let controller = ParcelController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.register(request).await?;
    Ok(Json(response))
}

async fn list_parcels(
    State(state): State<AppState>,
    Query(query): Query<ParcelListQuery>,
) -> Result<Json<Vec<ParcelWithBranches>>, AppError> {
    let controller = ParcelController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn admin_list_parcels(
    State(state): State<AppState>,
    Query(query): Query<AdminParcelQuery>,
) -> Result<Json<AdminParcelPage>, AppError> {
    let controller = ParcelController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.admin_list(query).await?;
    Ok(Json(response))
}

async fn get_parcel(
    State(state): State<AppState>,
    Path(tracking): Path<String>,
) -> Result<Json<ParcelWithBranches>, AppError> {
    let controller = ParcelController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.get_by_tracking(&tracking).await?;
    Ok(Json(response))
}

async fn update_parcel_details(
    State(state): State<AppState>,
    Path(tracking): Path<String>,
    Json(request): Json<UpdateParcelDetailsRequest>,
) -> Result<Json<ApiResponse<Parcel>>, AppError> {
    let controller = ParcelController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.update_details(&tracking, request).await?;
    Ok(Json(response))
}

async fn update_parcel_status(
    State(state): State<AppState>,
    Path(tracking): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<Parcel>>, AppError> {
    let controller = ParcelController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.update_status(&tracking, request).await?;
    Ok(Json(response))
}

async fn get_parcel_history(
    State(state): State<AppState>,
    Path(tracking): Path<String>,
) -> Result<Json<Vec<StatusHistoryEntry>>, AppError> {
    let controller = ParcelController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.history(&tracking).await?;
    Ok(Json(response))
}

async fn track_parcel(
    State(state): State<AppState>,
    Path(tracking): Path<String>,
) -> Result<Json<TrackingResponse>, AppError> {
    let controller = ParcelController::new(state.pool.clone(), state.notifier.clone());
    let response = controller.track(&tracking).await?;
    Ok(Json(response))
}
