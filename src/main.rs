mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use tokio::signal;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use database::{create_pool, init_schema};
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use services::notification::{NoopNotifier, Notifier, WebhookNotifier};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("📦 Courier Tracking - API de rastreo de paquetes");
    info!("================================================");

    let config = EnvironmentConfig::from_env();

    // Inicializar base de datos
    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if let Err(e) = init_schema(&pool).await {
        error!("❌ Error inicializando el esquema: {}", e);
        return Err(anyhow::anyhow!("Error de esquema: {}", e));
    }
    info!("✅ Esquema de base de datos listo");

    // Notificador: webhook si hay URL configurada, no-op en caso contrario
    let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
        Some(url) => {
            info!("🔔 Notificaciones via webhook: {}", url);
            Arc::new(WebhookNotifier::new(url.clone()))
        }
        None => {
            info!("🔕 Notificaciones deshabilitadas (NOTIFY_WEBHOOK_URL sin definir)");
            Arc::new(NoopNotifier)
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;

    // CORS abierto en desarrollo; con orígenes explícitos si están configurados
    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    let app_state = AppState::new(pool, config, notifier);

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/parcels", routes::parcel_routes::create_parcel_router())
        .nest("/api/track", routes::parcel_routes::create_tracking_router())
        .nest("/api/reports", routes::report_routes::create_report_router())
        .nest(
            "/api/dashboard",
            routes::report_routes::create_dashboard_router(),
        )
        .nest("/api/branches", routes::branch_routes::create_branch_router())
        .nest("/api/staff", routes::staff_routes::create_staff_router())
        .layer(cors)
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("📦 Endpoints - Parcels:");
    info!("   POST /api/parcels - Registrar paquete");
    info!("   GET  /api/parcels - Listar paquetes");
    info!("   GET  /api/parcels/admin - Listado paginado (admin)");
    info!("   GET  /api/parcels/:tracking - Obtener paquete");
    info!("   PUT  /api/parcels/:tracking/details - Actualizar detalles");
    info!("   PUT  /api/parcels/:tracking/status - Actualizar estado");
    info!("   GET  /api/parcels/:tracking/history - Historial de estados");
    info!("   GET  /api/track/:tracking - Vista pública de rastreo");
    info!("📊 Endpoints - Reports:");
    info!("   POST /api/reports/:kind - Generar reporte (parcels|staff|branches)");
    info!("   GET  /api/dashboard/stats - Estadísticas del dashboard");
    info!("🏢 Endpoints - Branches:");
    info!("   POST /api/branches - Crear sucursal");
    info!("   GET  /api/branches - Listar sucursales");
    info!("   GET  /api/branches/:id - Obtener sucursal");
    info!("👤 Endpoints - Staff:");
    info!("   POST /api/staff - Crear empleado");
    info!("   GET  /api/staff - Listar empleados");
    info!("   GET  /api/staff/:id - Obtener empleado");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "courier_tracking",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
