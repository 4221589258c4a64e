//! Rutas de sucursales

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::branch_controller::BranchController;
use crate::dto::branch_dto::CreateBranchRequest;
use crate::dto::ApiResponse;
use crate::models::Branch;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_branch_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_branch))
        .route("/", get(list_branches))
        .route("/:id", get(get_branch))
}

async fn create_branch(
    State(state): State<AppState>,
    Json(request): Json<CreateBranchRequest>,
) -> Result<Json<ApiResponse<Branch>>, AppError> {
    let controller = BranchController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_branches(
    State(state): State<AppState>,
) -> Result<Json<Vec<Branch>>, AppError> {
    let controller = BranchController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_branch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Branch>, AppError> {
    let controller = BranchController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}
