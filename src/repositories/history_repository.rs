//! Repositorio del historial de estados (append-only)
//!
//! Única fuente de verdad del recorrido de un parcel. Este módulo solo
//! sabe insertar y leer: no hay UPDATE ni DELETE contra
//! parcel_status_history en ninguna parte del código. `recorded_at` lo
//! asigna el reloj del servidor en el momento del append y el `id`
//! BIGSERIAL ordena entries que caen en el mismo timestamp.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::StatusHistoryEntry;
use crate::utils::errors::AppError;

pub struct HistoryRepository {
    pool: PgPool,
}

impl HistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append de una entrada dentro de la transacción del caller. Siempre
    /// es TransitionService quien abre esa transacción; nadie más escribe
    /// en el historial.
    pub async fn append_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        parcel_id: Uuid,
        status: &str,
        location: Option<&str>,
        comments: Option<&str>,
    ) -> Result<StatusHistoryEntry, sqlx::Error> {
        sqlx::query_as::<_, StatusHistoryEntry>(
            r#"
            INSERT INTO parcel_status_history (parcel_id, status, location, comments, recorded_at)
            VALUES ($1, $2, $3, $4, now())
            RETURNING *
            "#,
        )
        .bind(parcel_id)
        .bind(status)
        .bind(location)
        .bind(comments)
        .fetch_one(&mut **tx)
        .await
    }

    /// Historial completo de un parcel, descendente por recorded_at y
    /// después por id. Dos lecturas sin escrituras en medio devuelven
    /// exactamente la misma secuencia.
    pub async fn list_for_parcel(
        &self,
        parcel_id: Uuid,
    ) -> Result<Vec<StatusHistoryEntry>, AppError> {
        let entries = sqlx::query_as::<_, StatusHistoryEntry>(
            r#"
            SELECT * FROM parcel_status_history
            WHERE parcel_id = $1
            ORDER BY recorded_at DESC, id DESC
            "#,
        )
        .bind(parcel_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
