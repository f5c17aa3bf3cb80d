use anyhow::Context;
use std::env;

/// Configuración del proceso, cargada una sola vez en el arranque.
///
/// Los secretos HMAC viajan desde aquí hasta los constructores que los
/// usan; ningún módulo profundo lee el entorno por su cuenta.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: String,
    pub max_connections: u32,
    /// Secreto de los tokens de usuario emitidos en el login.
    pub jwt_secret: String,
    /// Secreto separado de los tokens servicio-a-servicio.
    pub internal_jwt_secret: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT").unwrap_or_else(|_| "3001".to_string()),
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            internal_jwt_secret: env::var("INTERNAL_JWT_SECRET")
                .context("INTERNAL_JWT_SECRET must be set")?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
