use anyhow::Context;
use std::env;

/// Configuración del proceso, cargada una sola vez en el arranque.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: String,
    pub max_connections: u32,
    /// Secreto compartido con Identity para los tokens servicio-a-servicio.
    pub internal_jwt_secret: String,
    /// URL base del Identity Service (sin el prefijo /api/v1).
    pub identity_url: String,
    /// Espera máxima de locks dentro del protocolo de escritura.
    pub lock_timeout_ms: u64,
    /// Tope por sentencia dentro del protocolo de escritura.
    pub statement_timeout_ms: u64,
    /// Intervalo del barrido de registros de idempotencia.
    pub sweeper_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT").unwrap_or_else(|_| "3002".to_string()),
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            internal_jwt_secret: env::var("INTERNAL_JWT_SECRET")
                .context("INTERNAL_JWT_SECRET must be set")?,
            identity_url: env::var("IDENTITY_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:3001".to_string()),
            lock_timeout_ms: env::var("LOCK_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_000),
            statement_timeout_ms: env::var("STATEMENT_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            sweeper_interval_secs: env::var("SWEEPER_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3_600),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
