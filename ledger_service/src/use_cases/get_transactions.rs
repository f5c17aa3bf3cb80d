use crate::domain::entities::{Transaction, TransactionType};
use crate::domain::error::LedgerError;
use crate::domain::repository::LedgerRepository;
use crate::domain::types::UserId;
use std::sync::Arc;

/// Caso de uso para listar los movimientos del principal autenticado.
///
/// Nunca cruza usuarios: el `user_id` viene de la guarda de
/// autenticación, no del cliente.
pub struct GetTransactionsUseCase {
    ledger_repo: Arc<dyn LedgerRepository>,
}

impl GetTransactionsUseCase {
    pub fn new(ledger_repo: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger_repo }
    }

    #[tracing::instrument(name = "GetTransactionsUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        user_id: UserId,
        transaction_type: Option<TransactionType>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        self.ledger_repo
            .find_by_user_id(user_id, transaction_type)
            .await
    }
}
