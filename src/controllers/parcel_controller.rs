//! Controller de parcels
//!
//! Puente entre las rutas y el ledger/motor de transiciones: valida los
//! requests y delega. El estado nunca se toca desde acá directamente;
//! todo cambio de estado pasa por TransitionService.

use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use validator::{Validate, ValidationError};

use crate::dto::parcel_dto::{
    AdminParcelPage, AdminParcelQuery, CreateParcelRequest, ParcelListQuery, TrackingResponse,
    UpdateParcelDetailsRequest, UpdateStatusRequest,
};
use crate::dto::ApiResponse;
use crate::models::{Parcel, ParcelWithBranches, StatusHistoryEntry};
use crate::repositories::{HistoryRepository, ParcelRepository};
use crate::services::notification::Notifier;
use crate::services::TransitionService;
use crate::utils::errors::AppError;
use crate::utils::validation::{field_errors, validate_weight};

const ADMIN_PAGE_SIZE: i64 = 10;

pub struct ParcelController {
    parcels: ParcelRepository,
    history: HistoryRepository,
    transitions: TransitionService,
}

impl ParcelController {
    pub fn new(pool: PgPool, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            parcels: ParcelRepository::new(pool.clone()),
            history: HistoryRepository::new(pool.clone()),
            transitions: TransitionService::new(pool, notifier),
        }
    }

    pub async fn register(
        &self,
        request: CreateParcelRequest,
    ) -> Result<ApiResponse<Parcel>, AppError> {
        request.validate()?;
        validate_weight(request.weight).map_err(|e| AppError::Validation(field_errors("weight", e)))?;
        Self::validate_price(request.price)?;

        let parcel = self.transitions.register(request).await?;

        Ok(ApiResponse::success_with_message(
            parcel,
            "Parcel registered successfully".to_string(),
        ))
    }

    pub async fn update_status(
        &self,
        tracking_number: &str,
        request: UpdateStatusRequest,
    ) -> Result<ApiResponse<Parcel>, AppError> {
        let parcel = self.transitions.transition(tracking_number, request).await?;

        Ok(ApiResponse::success_with_message(
            parcel,
            "Parcel status updated successfully".to_string(),
        ))
    }

    pub async fn update_details(
        &self,
        tracking_number: &str,
        request: UpdateParcelDetailsRequest,
    ) -> Result<ApiResponse<Parcel>, AppError> {
        request.validate()?;
        if let Some(weight) = request.weight {
            validate_weight(weight).map_err(|e| AppError::Validation(field_errors("weight", e)))?;
        }
        Self::validate_price(request.price)?;

        let parcel = self.parcels.update_details(tracking_number, &request).await?;

        Ok(ApiResponse::success_with_message(
            parcel,
            "Parcel details updated successfully".to_string(),
        ))
    }

    pub async fn get_by_tracking(
        &self,
        tracking_number: &str,
    ) -> Result<ParcelWithBranches, AppError> {
        self.parcels
            .find_with_branches(tracking_number)
            .await?
            .ok_or_else(|| Self::not_found(tracking_number))
    }

    pub async fn list(&self, query: ParcelListQuery) -> Result<Vec<ParcelWithBranches>, AppError> {
        self.parcels
            .list(query.status.as_deref(), query.branch_id)
            .await
    }

    pub async fn admin_list(&self, query: AdminParcelQuery) -> Result<AdminParcelPage, AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let offset = (page - 1) * ADMIN_PAGE_SIZE;

        let (parcels, total) = self
            .parcels
            .admin_list(
                query.status.as_deref(),
                query.search.as_deref(),
                ADMIN_PAGE_SIZE,
                offset,
            )
            .await?;

        let total_pages = (total + ADMIN_PAGE_SIZE - 1) / ADMIN_PAGE_SIZE;

        Ok(AdminParcelPage {
            parcels,
            total,
            page,
            total_pages,
        })
    }

    pub async fn history(
        &self,
        tracking_number: &str,
    ) -> Result<Vec<StatusHistoryEntry>, AppError> {
        let parcel = self
            .parcels
            .find_by_tracking(tracking_number)
            .await?
            .ok_or_else(|| Self::not_found(tracking_number))?;

        self.history.list_for_parcel(parcel.id).await
    }

    /// Vista pública de tracking para el cliente final.
    pub async fn track(&self, tracking_number: &str) -> Result<TrackingResponse, AppError> {
        let with_branches = self
            .parcels
            .find_with_branches(tracking_number)
            .await?
            .ok_or_else(|| Self::not_found(tracking_number))?;

        let history = self.history.list_for_parcel(with_branches.parcel.id).await?;

        Ok(TrackingResponse::from_parts(
            with_branches.parcel,
            with_branches.pickup_branch_name,
            with_branches.delivery_branch_name,
            history,
        ))
    }

    fn validate_price(price: Option<Decimal>) -> Result<(), AppError> {
        if let Some(price) = price {
            if price < Decimal::ZERO {
                let mut error = ValidationError::new("price");
                error.add_param("value".into(), &price.to_string());
                return Err(AppError::Validation(field_errors("price", error)));
            }
        }
        Ok(())
    }

    fn not_found(tracking_number: &str) -> AppError {
        AppError::NotFound(format!(
            "Parcel with tracking number '{}' not found",
            tracking_number
        ))
    }
}
