//! DTOs de la API
//!
//! Requests con validación (validator) y responses serializables.

pub mod branch_dto;
pub mod parcel_dto;
pub mod report_dto;
pub mod staff_dto;

use serde::Serialize;

/// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}
