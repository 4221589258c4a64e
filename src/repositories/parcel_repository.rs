//! Repositorio de parcels (el "ledger")
//!
//! Dueño de la identidad y los atributos primarios de cada parcel. Las
//! escrituras que tocan también el historial (alta y cambio de estado) se
//! hacen con las funciones tx-scoped, siempre dentro de la transacción que
//! abre TransitionService. No existe operación de borrado: los parcels son
//! registros permanentes.

use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::dto::parcel_dto::{CreateParcelRequest, UpdateParcelDetailsRequest};
use crate::models::{Parcel, ParcelWithBranches};
use crate::utils::errors::AppError;

const PARCEL_WITH_BRANCHES_SELECT: &str = r#"
    SELECT
        p.*,
        pb.street_building AS pickup_branch_name,
        db.street_building AS delivery_branch_name
    FROM parcel p
    LEFT JOIN branch pb ON p.pickup_branch_id = pb.id
    LEFT JOIN branch db ON p.delivery_branch_id = db.id
"#;

pub struct ParcelRepository {
    pool: PgPool,
}

impl ParcelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar un parcel nuevo dentro de una transacción abierta por el
    /// caller. El caller decide el tracking number y el estado inicial, y
    /// es responsable de reintentar si el UNIQUE de tracking_number salta.
    pub async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        tracking_number: &str,
        status: &str,
        request: &CreateParcelRequest,
    ) -> Result<Parcel, sqlx::Error> {
        sqlx::query_as::<_, Parcel>(
            r#"
            INSERT INTO parcel (
                id, tracking_number, sender_name, sender_address, sender_email, sender_phone,
                recipient_name, recipient_address, recipient_email, recipient_phone,
                weight, delicacy, size, price, current_status,
                pickup_branch_id, delivery_branch_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tracking_number)
        .bind(&request.sender_name)
        .bind(&request.sender_address)
        .bind(&request.sender_email)
        .bind(&request.sender_phone)
        .bind(&request.recipient_name)
        .bind(&request.recipient_address)
        .bind(&request.recipient_email)
        .bind(&request.recipient_phone)
        .bind(request.weight)
        .bind(&request.delicacy)
        .bind(&request.size)
        .bind(request.price.unwrap_or_default())
        .bind(status)
        .bind(request.pickup_branch_id)
        .bind(request.delivery_branch_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// Cargar un parcel por tracking number tomando el row lock. Serializa
    /// transiciones concurrentes sobre el mismo parcel; parcels distintos
    /// no se bloquean entre sí.
    pub async fn find_by_tracking_for_update(
        tx: &mut Transaction<'_, Postgres>,
        tracking_number: &str,
    ) -> Result<Option<Parcel>, sqlx::Error> {
        sqlx::query_as::<_, Parcel>("SELECT * FROM parcel WHERE tracking_number = $1 FOR UPDATE")
            .bind(tracking_number)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Actualizar el campo desnormalizado `current_status`. Solo se llama
    /// desde TransitionService, en la misma transacción que el append al
    /// historial.
    pub async fn set_current_status_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        parcel_id: Uuid,
        status: &str,
    ) -> Result<Parcel, sqlx::Error> {
        sqlx::query_as::<_, Parcel>(
            "UPDATE parcel SET current_status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(parcel_id)
        .bind(status)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn find_by_tracking(&self, tracking_number: &str) -> Result<Option<Parcel>, AppError> {
        let parcel = sqlx::query_as::<_, Parcel>("SELECT * FROM parcel WHERE tracking_number = $1")
            .bind(tracking_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(parcel)
    }

    /// Parcel + nombres de sucursales, para la vista de tracking.
    pub async fn find_with_branches(
        &self,
        tracking_number: &str,
    ) -> Result<Option<ParcelWithBranches>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(PARCEL_WITH_BRANCHES_SELECT);
        query.push(" WHERE p.tracking_number = ").push_bind(tracking_number);

        let parcel = query
            .build_query_as::<ParcelWithBranches>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(parcel)
    }

    /// Listado con filtros opcionales de estado y sucursal.
    pub async fn list(
        &self,
        status: Option<&str>,
        branch_id: Option<Uuid>,
    ) -> Result<Vec<ParcelWithBranches>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(PARCEL_WITH_BRANCHES_SELECT);
        query.push(" WHERE 1=1");

        if let Some(status) = status {
            query.push(" AND p.current_status = ").push_bind(status);
        }
        if let Some(branch_id) = branch_id {
            query
                .push(" AND (p.pickup_branch_id = ")
                .push_bind(branch_id)
                .push(" OR p.delivery_branch_id = ")
                .push_bind(branch_id)
                .push(")");
        }
        query.push(" ORDER BY p.created_at DESC");

        let parcels = query
            .build_query_as::<ParcelWithBranches>()
            .fetch_all(&self.pool)
            .await?;

        Ok(parcels)
    }

    /// Listado paginado de administración con búsqueda por tracking number,
    /// remitente o destinatario.
    pub async fn admin_list(
        &self,
        status: Option<&str>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ParcelWithBranches>, i64), AppError> {
        let total = {
            let mut count_query =
                QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM parcel p WHERE 1=1");
            Self::push_admin_filters(&mut count_query, status, search);

            count_query
                .build_query_scalar::<i64>()
                .fetch_one(&self.pool)
                .await?
        };

        let mut query = QueryBuilder::<Postgres>::new(PARCEL_WITH_BRANCHES_SELECT);
        query.push(" WHERE 1=1");
        Self::push_admin_filters(&mut query, status, search);
        query.push(" ORDER BY p.created_at DESC LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind(offset);

        let parcels = query
            .build_query_as::<ParcelWithBranches>()
            .fetch_all(&self.pool)
            .await?;

        Ok((parcels, total))
    }

    fn push_admin_filters<'a>(
        query: &mut QueryBuilder<'a, Postgres>,
        status: Option<&'a str>,
        search: Option<&'a str>,
    ) {
        if let Some(status) = status {
            query.push(" AND p.current_status = ").push_bind(status);
        }
        if let Some(search) = search {
            let pattern = format!("%{}%", search);
            query
                .push(" AND (p.tracking_number ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.sender_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.recipient_name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
    }

    /// Editar campos que no son el estado. El estado solo lo toca
    /// TransitionService. La lectura y la escritura van en una transacción
    /// con row lock: dos ediciones concurrentes del mismo parcel se
    /// serializan en vez de pisarse los campos.
    pub async fn update_details(
        &self,
        tracking_number: &str,
        request: &UpdateParcelDetailsRequest,
    ) -> Result<Parcel, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = Self::find_by_tracking_for_update(&mut tx, tracking_number)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Parcel with tracking number '{}' not found",
                    tracking_number
                ))
            })?;

        let parcel = sqlx::query_as::<_, Parcel>(
            r#"
            UPDATE parcel SET
                sender_name = $2, sender_address = $3, sender_email = $4, sender_phone = $5,
                recipient_name = $6, recipient_address = $7, recipient_email = $8, recipient_phone = $9,
                weight = $10, delicacy = $11, size = $12, price = $13,
                pickup_branch_id = $14, delivery_branch_id = $15
            WHERE tracking_number = $1
            RETURNING *
            "#,
        )
        .bind(tracking_number)
        .bind(request.sender_name.clone().unwrap_or(current.sender_name))
        .bind(request.sender_address.clone().unwrap_or(current.sender_address))
        .bind(request.sender_email.clone().or(current.sender_email))
        .bind(request.sender_phone.clone().or(current.sender_phone))
        .bind(request.recipient_name.clone().unwrap_or(current.recipient_name))
        .bind(request.recipient_address.clone().unwrap_or(current.recipient_address))
        .bind(request.recipient_email.clone().or(current.recipient_email))
        .bind(request.recipient_phone.clone().or(current.recipient_phone))
        .bind(request.weight.unwrap_or(current.weight))
        .bind(request.delicacy.clone().unwrap_or(current.delicacy))
        .bind(request.size.clone().unwrap_or(current.size))
        .bind(request.price.unwrap_or(current.price))
        .bind(request.pickup_branch_id.or(current.pickup_branch_id))
        .bind(request.delivery_branch_id.or(current.delivery_branch_id))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(parcel)
    }
}

/// Detectar una violación de UNIQUE (Postgres 23505). El loop de
/// regeneración de tracking numbers depende de esto.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}

// Tests de integración contra Postgres. Corren solo con DATABASE_URL
// definido; sin él se omiten en silencio.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::schema::init_schema;
    use crate::models::ParcelStatus;
    use crate::utils::tracking::generate_tracking_number;

    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = PgPool::connect(&url).await.ok()?;
        init_schema(&pool).await.ok()?;
        Some(pool)
    }

    fn create_request() -> CreateParcelRequest {
        CreateParcelRequest {
            sender_name: "Alice".to_string(),
            sender_address: "12 Riverside Drive".to_string(),
            sender_email: None,
            sender_phone: None,
            recipient_name: "Bob".to_string(),
            recipient_address: "3 Market Street".to_string(),
            recipient_email: None,
            recipient_phone: None,
            weight: 2.5,
            delicacy: "fragile".to_string(),
            size: "small".to_string(),
            price: None,
            pickup_branch_id: None,
            delivery_branch_id: None,
        }
    }

    fn empty_edit() -> UpdateParcelDetailsRequest {
        UpdateParcelDetailsRequest {
            sender_name: None,
            sender_address: None,
            sender_email: None,
            sender_phone: None,
            recipient_name: None,
            recipient_address: None,
            recipient_email: None,
            recipient_phone: None,
            weight: None,
            delicacy: None,
            size: None,
            price: None,
            pickup_branch_id: None,
            delivery_branch_id: None,
        }
    }

    async fn insert_parcel(pool: &PgPool) -> Parcel {
        let mut tx = pool.begin().await.unwrap();
        let parcel = ParcelRepository::insert_in_tx(
            &mut tx,
            &generate_tracking_number(),
            ParcelStatus::initial().as_str(),
            &create_request(),
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();
        parcel
    }

    #[tokio::test]
    async fn concurrent_detail_edits_both_land() {
        let Some(pool) = test_pool().await else { return };
        let repository = ParcelRepository::new(pool.clone());
        let parcel = insert_parcel(&pool).await;

        let mut sender_edit = empty_edit();
        sender_edit.sender_name = Some("Nuevo Remitente".to_string());
        let mut weight_edit = empty_edit();
        weight_edit.weight = Some(9.5);

        // Sin el row lock una edición leería el estado previo a la otra y
        // pisaría su campo al reescribir la fila completa.
        let (a, b) = tokio::join!(
            repository.update_details(&parcel.tracking_number, &sender_edit),
            repository.update_details(&parcel.tracking_number, &weight_edit),
        );
        a.unwrap();
        b.unwrap();

        let current = repository
            .find_by_tracking(&parcel.tracking_number)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.sender_name, "Nuevo Remitente");
        assert!((current.weight - 9.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn update_details_unknown_tracking_is_not_found() {
        let Some(pool) = test_pool().await else { return };
        let repository = ParcelRepository::new(pool);

        let result = repository
            .update_details("DXNOSUCHPARCEL", &empty_edit())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
