//! DTOs de Branch

use serde::Deserialize;
use validator::Validate;

/// Request para registrar una sucursal
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBranchRequest {
    #[validate(length(min = 1, max = 100))]
    pub country: String,

    #[validate(length(min = 1, max = 100))]
    pub county: String,

    #[validate(length(min = 1, max = 200))]
    pub location: String,

    #[validate(length(min = 1, max = 200))]
    pub street_building: String,

    #[validate(length(max = 20))]
    pub postal_code: Option<String>,

    #[validate(length(max = 100))]
    pub contact: Option<String>,
}
