use crate::domain::entities::DatabaseStatus;
use crate::domain::error::LedgerError;
use crate::domain::repository::LedgerRepository;
use std::sync::Arc;

/// Caso de uso del endpoint de salud: reporta el estado de la dependencia
/// de base de datos.
pub struct GetStatusUseCase {
    ledger_repo: Arc<dyn LedgerRepository>,
}

impl GetStatusUseCase {
    pub fn new(ledger_repo: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger_repo }
    }

    #[tracing::instrument(name = "GetStatusUseCase::execute", skip(self))]
    pub async fn execute(&self) -> Result<DatabaseStatus, LedgerError> {
        self.ledger_repo.database_status().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockLedgerRepository;

    #[tokio::test]
    async fn test_status_reports_database_health() {
        let mut mock_repo = MockLedgerRepository::new();

        mock_repo.expect_database_status().times(1).returning(|| {
            Ok(DatabaseStatus {
                version: "PostgreSQL 16.2".to_string(),
                max_connections: 100,
                open_connections: 3,
            })
        });

        let use_case = GetStatusUseCase::new(Arc::new(mock_repo));
        let status = use_case.execute().await.unwrap();

        assert_eq!(status.max_connections, 100);
        assert_eq!(status.open_connections, 3);
    }
}
