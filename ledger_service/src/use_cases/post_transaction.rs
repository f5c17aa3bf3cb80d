use crate::domain::entities::{NewPosting, TransactionReceipt, TransactionType};
use crate::domain::error::LedgerError;
use crate::domain::repository::{LedgerRepository, PostingOutcome};
use crate::domain::types::UserId;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Presupuesto de intentos frente a conflictos de serialización.
const MAX_ATTEMPTS: u32 = 10;
/// Base del backoff exponencial entre intentos.
const BACKOFF_BASE_MS: u64 = 100;
/// Jitter uniforme sumado a cada espera.
const BACKOFF_JITTER_MS: u64 = 50;

/// Caso de uso central: postear un movimiento contra el balance de un
/// usuario.
///
/// El repositorio ejecuta UN intento del protocolo dentro de una
/// transacción SERIALIZABLE; este caso de uso es el dueño del bucle de
/// reintentos. Un conflicto de serialización (la base no pudo ordenar el
/// commit) se reintenta hasta diez veces con backoff exponencial y jitter.
/// `InvalidAmount`, `InsufficientBalance` y los duplicados de idempotencia
/// son desenlaces terminales: jamás se reintentan.
pub struct PostTransactionUseCase {
    ledger_repo: Arc<dyn LedgerRepository>,
}

impl PostTransactionUseCase {
    pub fn new(ledger_repo: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger_repo }
    }

    /// Ejecuta el posteo. Un replay de idempotencia se resuelve aquí como
    /// éxito: el cliente recibe el sobre original, no un error.
    #[tracing::instrument(name = "PostTransactionUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        user_id: UserId,
        transaction_type: TransactionType,
        amount: i64,
        idempotency_key: Option<String>,
    ) -> Result<TransactionReceipt, LedgerError> {
        // El monto se valida antes de abrir cualquier transacción de base.
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let posting = NewPosting {
            user_id,
            transaction_type,
            amount,
            idempotency_key,
        };

        let mut attempt: u32 = 1;
        loop {
            match self.ledger_repo.post_transaction(&posting).await {
                Ok(outcome) => return Ok(outcome.into_receipt()),
                Err(LedgerError::SerializationConflict) if attempt < MAX_ATTEMPTS => {
                    let backoff = backoff_with_jitter(attempt);
                    warn!(
                        "Serialization conflict for user {} (attempt {}/{}), retrying in {:?}",
                        posting.user_id, attempt, MAX_ATTEMPTS, backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(LedgerError::SerializationConflict) => {
                    return Err(LedgerError::RetriesExhausted(MAX_ATTEMPTS));
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Espera del intento `n`: `2^(n-1) * 100ms + rand(0, 50)ms`.
fn backoff_with_jitter(attempt: u32) -> Duration {
    let exponential = BACKOFF_BASE_MS * 2u64.pow(attempt - 1);
    let jitter = rand::thread_rng().gen_range(0..BACKOFF_JITTER_MS);
    Duration::from_millis(exponential + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockLedgerRepository;
    use crate::domain::types::TransactionId;
    use mockall::Sequence;
    use uuid::Uuid;

    fn receipt_for(user_id: UserId, amount: i64) -> TransactionReceipt {
        TransactionReceipt {
            id: TransactionId::new(),
            user_id,
            amount,
            transaction_type: TransactionType::CREDIT,
        }
    }

    #[tokio::test]
    async fn test_post_commits_on_first_attempt() {
        let mut mock_repo = MockLedgerRepository::new();
        let user_id = UserId(Uuid::new_v4());
        let receipt = receipt_for(user_id, 50_000);
        let expected = receipt.clone();

        mock_repo
            .expect_post_transaction()
            .withf(move |p: &NewPosting| {
                p.user_id == user_id
                    && p.amount == 50_000
                    && p.transaction_type == TransactionType::CREDIT
            })
            .times(1)
            .returning(move |_| Ok(PostingOutcome::Committed(receipt.clone())));

        let use_case = PostTransactionUseCase::new(Arc::new(mock_repo));
        let result = use_case
            .execute(user_id, TransactionType::CREDIT, 50_000, None)
            .await
            .unwrap();

        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_post_rejects_non_positive_amount_before_any_db_work() {
        let mut mock_repo = MockLedgerRepository::new();
        mock_repo.expect_post_transaction().times(0);

        let use_case = PostTransactionUseCase::new(Arc::new(mock_repo));

        for amount in [0, -1, -50_000] {
            let result = use_case
                .execute(
                    UserId(Uuid::new_v4()),
                    TransactionType::DEBIT,
                    amount,
                    None,
                )
                .await;
            assert!(matches!(result, Err(LedgerError::InvalidAmount(a)) if a == amount));
        }
    }

    #[tokio::test]
    async fn test_duplicate_outcome_resolves_to_original_receipt() {
        let mut mock_repo = MockLedgerRepository::new();
        let user_id = UserId(Uuid::new_v4());
        let receipt = receipt_for(user_id, 1_500);
        let expected = receipt.clone();

        mock_repo
            .expect_post_transaction()
            .times(1)
            .returning(move |_| Ok(PostingOutcome::Duplicate(receipt.clone())));

        let use_case = PostTransactionUseCase::new(Arc::new(mock_repo));
        let result = use_case
            .execute(
                user_id,
                TransactionType::CREDIT,
                1_500,
                Some("k1".to_string()),
            )
            .await
            .unwrap();

        // El replay es un éxito con el sobre de la transacción original.
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_insufficient_balance_is_terminal() {
        let mut mock_repo = MockLedgerRepository::new();

        // Un solo intento: este desenlace nunca se reintenta.
        mock_repo.expect_post_transaction().times(1).returning(|_| {
            Err(LedgerError::InsufficientBalance {
                current_balance: 0,
                requested_amount: 1,
            })
        });

        let use_case = PostTransactionUseCase::new(Arc::new(mock_repo));
        let result = use_case
            .execute(UserId(Uuid::new_v4()), TransactionType::DEBIT, 1, None)
            .await;

        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance {
                current_balance: 0,
                requested_amount: 1,
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_serialization_conflicts_are_retried_until_success() {
        let mut mock_repo = MockLedgerRepository::new();
        let user_id = UserId(Uuid::new_v4());
        let receipt = receipt_for(user_id, 1_000);
        let expected = receipt.clone();

        let mut seq = Sequence::new();
        mock_repo
            .expect_post_transaction()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(LedgerError::SerializationConflict));
        mock_repo
            .expect_post_transaction()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(PostingOutcome::Committed(receipt.clone())));

        let use_case = PostTransactionUseCase::new(Arc::new(mock_repo));
        let result = use_case
            .execute(user_id, TransactionType::CREDIT, 1_000, None)
            .await
            .unwrap();

        assert_eq!(result, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_ten_conflicting_attempts() {
        let mut mock_repo = MockLedgerRepository::new();

        mock_repo
            .expect_post_transaction()
            .times(MAX_ATTEMPTS as usize)
            .returning(|_| Err(LedgerError::SerializationConflict));

        let use_case = PostTransactionUseCase::new(Arc::new(mock_repo));
        let result = use_case
            .execute(UserId(Uuid::new_v4()), TransactionType::CREDIT, 100, None)
            .await;

        assert!(matches!(
            result,
            Err(LedgerError::RetriesExhausted(MAX_ATTEMPTS))
        ));
    }

    #[test]
    fn test_backoff_grows_exponentially_with_bounded_jitter() {
        for (attempt, base) in [(1, 100), (2, 200), (3, 400), (4, 800)] {
            let backoff = backoff_with_jitter(attempt).as_millis() as u64;
            assert!(backoff >= base, "attempt {}: {} < {}", attempt, backoff, base);
            assert!(
                backoff < base + BACKOFF_JITTER_MS,
                "attempt {}: {} >= {}",
                attempt,
                backoff,
                base + BACKOFF_JITTER_MS
            );
        }
    }
}
