//! Controller de staff

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::staff_dto::CreateStaffRequest;
use crate::dto::ApiResponse;
use crate::models::{Staff, StaffWithBranch};
use crate::repositories::StaffRepository;
use crate::utils::errors::AppError;

pub struct StaffController {
    repository: StaffRepository,
}

impl StaffController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: StaffRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateStaffRequest,
    ) -> Result<ApiResponse<Staff>, AppError> {
        request.validate()?;

        let staff = self.repository.create(&request).await?;

        Ok(ApiResponse::success_with_message(
            staff,
            "Staff member created successfully".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<StaffWithBranch, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Staff member with id '{}' not found", id)))
    }

    pub async fn list(&self) -> Result<Vec<StaffWithBranch>, AppError> {
        self.repository.list().await
    }
}
