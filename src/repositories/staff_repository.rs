//! Repositorio de staff
//!
//! Datos de referencia para los joins de reporting (un staff "maneja" los
//! parcels cuya sucursal de pickup o delivery coincide con la suya).

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::staff_dto::CreateStaffRequest;
use crate::models::{Staff, StaffWithBranch};
use crate::utils::errors::{conflict_error, AppError};

use super::parcel_repository::is_unique_violation;
use crate::utils::tracking::generate_employee_id;

pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &CreateStaffRequest) -> Result<Staff, AppError> {
        let employee_id = generate_employee_id();

        let staff = sqlx::query_as::<_, Staff>(
            r#"
            INSERT INTO staff (id, employee_id, first_name, last_name, email, branch_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&employee_id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(request.branch_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                conflict_error("Staff", "email", &request.email)
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(staff)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<StaffWithBranch>, AppError> {
        let staff = sqlx::query_as::<_, StaffWithBranch>(
            r#"
            SELECT s.*, b.street_building AS branch_name
            FROM staff s
            LEFT JOIN branch b ON s.branch_id = b.id
            WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    pub async fn list(&self) -> Result<Vec<StaffWithBranch>, AppError> {
        let staff = sqlx::query_as::<_, StaffWithBranch>(
            r#"
            SELECT s.*, b.street_building AS branch_name
            FROM staff s
            LEFT JOIN branch b ON s.branch_id = b.id
            ORDER BY s.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(staff)
    }
}
