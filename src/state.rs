//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::notification::Notifier;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            pool,
            config,
            notifier,
        }
    }
}
