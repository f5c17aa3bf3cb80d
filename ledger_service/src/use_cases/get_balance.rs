use crate::domain::error::LedgerError;
use crate::domain::repository::LedgerRepository;
use crate::domain::types::UserId;
use std::sync::Arc;

/// Caso de uso para leer el balance consolidado del principal.
pub struct GetBalanceUseCase {
    ledger_repo: Arc<dyn LedgerRepository>,
}

impl GetBalanceUseCase {
    pub fn new(ledger_repo: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger_repo }
    }

    #[tracing::instrument(name = "GetBalanceUseCase::execute", skip(self))]
    pub async fn execute(&self, user_id: UserId) -> Result<i64, LedgerError> {
        self.ledger_repo.balance_for_user(user_id).await
    }
}
