//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    /// URL del webhook de notificaciones. Si no está definida, las
    /// notificaciones se descartan silenciosamente.
    pub notify_webhook_url: Option<String>,
}

impl EnvironmentConfig {
    /// Cargar la configuración desde el entorno, con defaults de desarrollo.
    pub fn from_env() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            notify_webhook_url: env::var("NOTIFY_WEBHOOK_URL").ok(),
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_url() {
        let config = EnvironmentConfig {
            environment: "development".to_string(),
            port: 4000,
            host: "127.0.0.1".to_string(),
            cors_origins: vec![],
            notify_webhook_url: None,
        };
        assert_eq!(config.server_url(), "127.0.0.1:4000");
        assert!(config.is_development());
        assert!(!config.is_production());
    }
}
