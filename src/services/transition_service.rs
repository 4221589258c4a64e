//! Motor de transiciones de estado
//!
//! Único escritor de `parcel.current_status` y del historial. Cada
//! transición es una transacción: append al historial + update del campo
//! desnormalizado, o nada. El alta de un parcel es la transición
//! "bootstrap": insert del parcel y primer entry del historial en la misma
//! transacción.
//!
//! La máquina de estados es permisiva a propósito: cualquier estado del
//! vocabulario puede seguir a cualquier otro, duplicados incluidos, y el
//! estado terminal no se bloquea mecánicamente. Gap conocido, no
//! restringir sin revisar los flujos de staff.

use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::dto::parcel_dto::{CreateParcelRequest, UpdateStatusRequest};
use crate::models::{Parcel, ParcelStatus};
use crate::repositories::branch_repository::BranchRepository;
use crate::repositories::history_repository::HistoryRepository;
use crate::repositories::parcel_repository::{is_unique_violation, ParcelRepository};
use crate::services::notification::{
    dispatch_parcel_registered, dispatch_status_updated, Notifier, ParcelRegisteredNotice,
    StatusUpdatedNotice,
};
use crate::utils::errors::AppError;
use crate::utils::tracking::generate_tracking_number;

/// Reintentos de generación de tracking number ante colisión de UNIQUE.
const MAX_TRACKING_ATTEMPTS: u32 = 5;

pub struct TransitionService {
    pool: PgPool,
    notifier: Arc<dyn Notifier>,
}

impl TransitionService {
    pub fn new(pool: PgPool, notifier: Arc<dyn Notifier>) -> Self {
        Self { pool, notifier }
    }

    /// Registrar un parcel: transición bootstrap. Inserta el parcel con el
    /// estado inicial del vocabulario y su primera entrada de historial en
    /// una sola transacción. Si el tracking number generado colisiona, se
    /// regenera en silencio hasta agotar los intentos.
    pub async fn register(&self, request: CreateParcelRequest) -> Result<Parcel, AppError> {
        let initial = ParcelStatus::initial();

        for attempt in 1..=MAX_TRACKING_ATTEMPTS {
            let tracking_number = generate_tracking_number();
            let mut tx = self.pool.begin().await?;

            let parcel = match ParcelRepository::insert_in_tx(
                &mut tx,
                &tracking_number,
                initial.as_str(),
                &request,
            )
            .await
            {
                Ok(parcel) => parcel,
                Err(e) if is_unique_violation(&e) => {
                    // Colisión de tracking number: regenerar y reintentar.
                    let _ = tx.rollback().await;
                    info!(
                        "Tracking number {} ya existe, regenerando (intento {}/{})",
                        tracking_number, attempt, MAX_TRACKING_ATTEMPTS
                    );
                    continue;
                }
                Err(e) => return Err(AppError::Database(e)),
            };

            HistoryRepository::append_in_tx(
                &mut tx,
                parcel.id,
                initial.as_str(),
                Some("Initial Location"),
                None,
            )
            .await?;

            tx.commit().await?;

            info!(
                "📦 Parcel {} registrado con estado '{}'",
                parcel.tracking_number, parcel.current_status
            );

            self.notify_registered(&parcel).await;
            return Ok(parcel);
        }

        Err(AppError::Conflict(format!(
            "Could not allocate a unique tracking number after {} attempts",
            MAX_TRACKING_ATTEMPTS
        )))
    }

    /// Aplicar una transición de estado. Secuencia:
    /// 1. validar el estado contra el vocabulario,
    /// 2. cargar el parcel con row lock (serializa transiciones
    ///    concurrentes sobre el mismo tracking number),
    /// 3. append al historial + update de current_status, misma transacción,
    /// 4. commit y notificación best-effort en background.
    pub async fn transition(
        &self,
        tracking_number: &str,
        request: UpdateStatusRequest,
    ) -> Result<Parcel, AppError> {
        let status = ParcelStatus::parse(&request.status).ok_or_else(|| {
            AppError::InvalidStatus(format!(
                "'{}' is not a valid parcel status",
                request.status
            ))
        })?;

        let mut tx = self.pool.begin().await?;

        let parcel = ParcelRepository::find_by_tracking_for_update(&mut tx, tracking_number)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Parcel with tracking number '{}' not found",
                    tracking_number
                ))
            })?;

        HistoryRepository::append_in_tx(
            &mut tx,
            parcel.id,
            status.as_str(),
            request.location.as_deref(),
            request.comments.as_deref(),
        )
        .await?;

        let updated =
            ParcelRepository::set_current_status_in_tx(&mut tx, parcel.id, status.as_str()).await?;

        tx.commit().await?;

        info!(
            "📦 Parcel {}: '{}' -> '{}'",
            updated.tracking_number, parcel.current_status, updated.current_status
        );

        dispatch_status_updated(
            self.notifier.clone(),
            StatusUpdatedNotice {
                tracking_number: updated.tracking_number.clone(),
                status: updated.current_status.clone(),
                location: request.location,
                comments: request.comments,
                sender_email: updated.sender_email.clone(),
                recipient_email: updated.recipient_email.clone(),
            },
        );

        Ok(updated)
    }

    /// Armar y despachar el aviso de registro. La búsqueda del nombre de
    /// la sucursal es best-effort: si falla, el aviso sale sin ella.
    async fn notify_registered(&self, parcel: &Parcel) {
        let branches = BranchRepository::new(self.pool.clone());
        let pickup_branch = branches
            .display_name(parcel.pickup_branch_id)
            .await
            .unwrap_or(None);

        dispatch_parcel_registered(
            self.notifier.clone(),
            ParcelRegisteredNotice {
                tracking_number: parcel.tracking_number.clone(),
                status: parcel.current_status.clone(),
                sender_name: parcel.sender_name.clone(),
                sender_email: parcel.sender_email.clone(),
                recipient_name: parcel.recipient_name.clone(),
                recipient_email: parcel.recipient_email.clone(),
                weight: parcel.weight,
                delicacy: parcel.delicacy.clone(),
                size: parcel.size.clone(),
                pickup_branch,
            },
        );
    }
}
