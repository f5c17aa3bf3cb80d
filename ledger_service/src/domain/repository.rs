use crate::domain::entities::{
    DatabaseStatus, NewPosting, Transaction, TransactionReceipt, TransactionType,
};
use crate::domain::error::LedgerError;
use crate::domain::types::UserId;
use async_trait::async_trait;

/// Desenlace de un intento de posteo.
#[derive(Debug, Clone, PartialEq)]
pub enum PostingOutcome {
    /// El intento comprometió una transacción nueva.
    Committed(TransactionReceipt),
    /// Una clave de idempotencia ya finalizada respondió por nosotros;
    /// el sobre es el de la transacción original.
    Duplicate(TransactionReceipt),
}

impl PostingOutcome {
    pub fn into_receipt(self) -> TransactionReceipt {
        match self {
            PostingOutcome::Committed(receipt) | PostingOutcome::Duplicate(receipt) => receipt,
        }
    }
}

// Port for Ledger persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// UN intento del protocolo de escritura, ejecutado completo dentro de
    /// una transacción SERIALIZABLE. `SerializationConflict` significa que
    /// el llamador puede reintentar; el bucle de reintentos vive fuera.
    async fn post_transaction(&self, posting: &NewPosting)
        -> Result<PostingOutcome, LedgerError>;

    /// Movimientos del usuario, del más reciente al más antiguo,
    /// opcionalmente filtrados por sentido.
    async fn find_by_user_id(
        &self,
        user_id: UserId,
        transaction_type: Option<TransactionType>,
    ) -> Result<Vec<Transaction>, LedgerError>;

    /// Balance actual: lee el snapshot, o suma el log si el usuario aún no
    /// tiene snapshot.
    async fn balance_for_user(&self, user_id: UserId) -> Result<i64, LedgerError>;

    /// Borra registros de idempotencia vencidos. Retorna cuántos cayeron.
    async fn delete_expired_idempotency_keys(&self) -> Result<u64, LedgerError>;

    async fn database_status(&self) -> Result<DatabaseStatus, LedgerError>;
}
