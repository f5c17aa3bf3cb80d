use crate::domain::entities::{Transaction, TransactionType};
use crate::domain::types::{TransactionId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct TransactionModel {
    pub id: TransactionId,
    pub user_id: UserId,
    #[sqlx(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: i64,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TransactionModel> for Transaction {
    fn from(m: TransactionModel) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            transaction_type: m.transaction_type,
            amount: m.amount,
            idempotency_key: m.idempotency_key,
            created_at: m.created_at,
        }
    }
}
