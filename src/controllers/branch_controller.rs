//! Controller de sucursales

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::branch_dto::CreateBranchRequest;
use crate::dto::ApiResponse;
use crate::models::Branch;
use crate::repositories::BranchRepository;
use crate::utils::errors::AppError;

pub struct BranchController {
    repository: BranchRepository,
}

impl BranchController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BranchRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateBranchRequest,
    ) -> Result<ApiResponse<Branch>, AppError> {
        request.validate()?;

        let branch = self.repository.create(&request).await?;

        Ok(ApiResponse::success_with_message(
            branch,
            "Branch created successfully".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Branch, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Branch with id '{}' not found", id)))
    }

    pub async fn list(&self) -> Result<Vec<Branch>, AppError> {
        self.repository.list().await
    }
}
