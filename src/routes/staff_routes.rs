//! Rutas de staff

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::staff_controller::StaffController;
use crate::dto::staff_dto::CreateStaffRequest;
use crate::dto::ApiResponse;
use crate::models::{Staff, StaffWithBranch};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_staff_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_staff))
        .route("/", get(list_staff))
        .route("/:id", get(get_staff))
}

async fn create_staff(
    State(state): State<AppState>,
    Json(request): Json<CreateStaffRequest>,
) -> Result<Json<ApiResponse<Staff>>, AppError> {
    let controller = StaffController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_staff(
    State(state): State<AppState>,
) -> Result<Json<Vec<StaffWithBranch>>, AppError> {
    let controller = StaffController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_staff(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StaffWithBranch>, AppError> {
    let controller = StaffController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}
