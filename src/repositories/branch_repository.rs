//! Repositorio de sucursales
//!
//! Datos de referencia: alta y lecturas, sin más. El core los consume para
//! poblar pickup/delivery y para los joins de reporting.

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::branch_dto::CreateBranchRequest;
use crate::models::Branch;
use crate::utils::errors::{conflict_error, AppError};

use super::parcel_repository::is_unique_violation;
use crate::utils::tracking::generate_branch_code;

pub struct BranchRepository {
    pool: PgPool,
}

impl BranchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &CreateBranchRequest) -> Result<Branch, AppError> {
        let branch_code = generate_branch_code();

        let branch = sqlx::query_as::<_, Branch>(
            r#"
            INSERT INTO branch (id, branch_code, country, county, location, street_building, postal_code, contact, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&branch_code)
        .bind(&request.country)
        .bind(&request.county)
        .bind(&request.location)
        .bind(&request.street_building)
        .bind(&request.postal_code)
        .bind(&request.contact)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                conflict_error("Branch", "branch_code", &branch_code)
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(branch)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Branch>, AppError> {
        let branch = sqlx::query_as::<_, Branch>("SELECT * FROM branch WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(branch)
    }

    pub async fn list(&self) -> Result<Vec<Branch>, AppError> {
        let branches =
            sqlx::query_as::<_, Branch>("SELECT * FROM branch ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(branches)
    }

    /// Nombre visible de una sucursal, para los payloads de notificación.
    pub async fn display_name(&self, id: Option<Uuid>) -> Result<Option<String>, AppError> {
        let Some(id) = id else {
            return Ok(None);
        };

        Ok(self
            .find_by_id(id)
            .await?
            .map(|b| format!("{}, {}", b.street_building, b.location)))
    }
}
