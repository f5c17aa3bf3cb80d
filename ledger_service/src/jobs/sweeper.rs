use crate::domain::repository::LedgerRepository;
use std::sync::Arc;
use tracing::{error, info};

/// Job en segundo plano que barre registros de idempotencia vencidos.
///
/// Los registros finalizados vencen a las 24 horas y las reservas a los 90
/// días; además se reclaman reservas huérfanas (un proceso que murió a
/// mitad de commit dejaría la fila sin finalizar). Corre fuera del camino
/// caliente, en el intervalo configurado en el arranque.
pub struct IdempotencySweeperJob {
    ledger_repo: Arc<dyn LedgerRepository>,
}

impl IdempotencySweeperJob {
    pub fn new(ledger_repo: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger_repo }
    }

    /// Ejecuta una pasada de barrido.
    pub async fn run(&self) {
        match self.ledger_repo.delete_expired_idempotency_keys().await {
            Ok(0) => {}
            Ok(deleted) => {
                info!("Swept {} expired idempotency records", deleted);
            }
            Err(e) => {
                error!("Idempotency sweep failed: {:?}", e);
            }
        }
    }
}
