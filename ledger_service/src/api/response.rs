use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::entities::DatabaseStatus;

/// Respuesta de `GET /balance`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    /// Centavos.
    pub amount: i64,
}

/// Respuesta de `GET /status`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub database: DatabaseStatusView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DatabaseStatusView {
    pub version: String,
    pub max_connections: i32,
    pub open_connections: u32,
}

impl From<DatabaseStatus> for StatusResponse {
    fn from(status: DatabaseStatus) -> Self {
        Self {
            database: DatabaseStatusView {
                version: status.version,
                max_connections: status.max_connections,
                open_connections: status.open_connections,
            },
        }
    }
}
