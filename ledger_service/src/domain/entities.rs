use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{TransactionId, UserId};

/// Sentido de un movimiento: abono o cargo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    CREDIT,
    DEBIT,
}

/// Una entrada del log de movimientos. El log es append-only: una vez
/// comprometida, la fila jamás se modifica.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Centavos, siempre positivo.
    pub amount: i64,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Snapshot consolidado del balance de un usuario.
///
/// Es una vista materializada del log: en todo estado comprometido,
/// `balance` es igual a la suma de CREDITs menos la suma de DEBITs, y
/// `version` crece exactamente 1 por escritura.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: uuid::Uuid,
    pub user_id: UserId,
    pub balance: i64,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos de un movimiento por postear, ya autenticado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPosting {
    pub user_id: UserId,
    pub transaction_type: TransactionType,
    pub amount: i64,
    pub idempotency_key: Option<String>,
}

/// Sobre de respuesta de un posteo. Es exactamente lo que se cachea en el
/// registro de idempotencia, así un replay devuelve bytes equivalentes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub id: TransactionId,
    pub user_id: UserId,
    pub amount: i64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl From<&Transaction> for TransactionReceipt {
    fn from(t: &Transaction) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            amount: t.amount,
            transaction_type: t.transaction_type,
        }
    }
}

/// Salud de la base de datos reportada por `GET /status`.
#[derive(Debug, Clone)]
pub struct DatabaseStatus {
    pub version: String,
    pub max_connections: i32,
    pub open_connections: u32,
}
