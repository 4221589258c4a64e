//! DTOs de Staff

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Request para registrar un miembro del staff
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStaffRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    pub branch_id: Option<Uuid>,
}
