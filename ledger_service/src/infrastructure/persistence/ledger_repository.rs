use crate::domain::entities::{
    DatabaseStatus, NewPosting, Transaction, TransactionReceipt, TransactionType,
};
use crate::domain::error::LedgerError;
use crate::domain::repository::{LedgerRepository, PostingOutcome};
use crate::domain::types::{TransactionId, UserId};
use crate::infrastructure::persistence::models::TransactionModel;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction as PgTransaction};
use uuid::Uuid;

/// Marcador de una reserva de idempotencia aún sin finalizar.
const PENDING_SENTINEL: &str = "__PENDING__";

/// Repositorio del ledger implementado para PostgreSQL.
///
/// El método central, `post_transaction`, ejecuta UN intento completo del
/// protocolo de escritura dentro de una transacción SERIALIZABLE. La base
/// certifica que la lectura del snapshot y las escrituras posteriores
/// forman una agenda serial con cualquier escritor concurrente del mismo
/// usuario; un conflicto se reporta como `SerializationConflict` y el caso
/// de uso decide el reintento.
pub struct PostgresLedgerRepository {
    pool: PgPool,
    lock_timeout_ms: u64,
    statement_timeout_ms: u64,
}

impl PostgresLedgerRepository {
    /// Crea el repositorio con los timeouts por defecto (5s de espera de
    /// locks, 10s por sentencia).
    pub fn new(pool: PgPool) -> Self {
        Self::with_timeouts(pool, 5_000, 10_000)
    }

    pub fn with_timeouts(pool: PgPool, lock_timeout_ms: u64, statement_timeout_ms: u64) -> Self {
        Self {
            pool,
            lock_timeout_ms,
            statement_timeout_ms,
        }
    }

    /// Sondea la clave y, si está libre, la reserva.
    ///
    /// Retorna `Some(receipt)` cuando un registro finalizado y vigente ya
    /// responde por esta clave. Una reserva viva de otro escritor condena
    /// el intento: se reporta como conflicto para que el reintento observe
    /// el desenlace del ganador.
    async fn probe_and_reserve(
        &self,
        tx: &mut PgTransaction<'_, Postgres>,
        key: &str,
    ) -> Result<Option<TransactionReceipt>, LedgerError> {
        let cached: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT response FROM idempotency_keys
            WHERE key = $1 AND expires_at > NOW()
            "#,
        )
        .bind(key)
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_sqlx_error)?;

        if let Some((response,)) = cached {
            if response != PENDING_SENTINEL {
                let receipt = serde_json::from_str(&response).map_err(|e| {
                    LedgerError::RepositoryError(format!(
                        "Corrupt cached response for key {}: {}",
                        key, e
                    ))
                })?;
                return Ok(Some(receipt));
            }
            return Err(LedgerError::SerializationConflict);
        }

        // Reserva en una sola sentencia. El ON CONFLICT solo recicla filas
        // vencidas; cero filas afectadas significa que otro escritor tiene
        // la clave. Bajo SERIALIZABLE un insert concurrente de la misma
        // clave aflora como SQLSTATE 40001: mismo tratamiento.
        let result = sqlx::query(
            r#"
            INSERT INTO idempotency_keys (id, key, response, created_at, expires_at)
            VALUES ($1, $2, $3, NOW(), NOW() + INTERVAL '90 days')
            ON CONFLICT (key) DO UPDATE
                SET response = EXCLUDED.response,
                    created_at = EXCLUDED.created_at,
                    expires_at = EXCLUDED.expires_at
                WHERE idempotency_keys.expires_at <= NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(key)
        .bind(PENDING_SENTINEL)
        .execute(&mut **tx)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::SerializationConflict);
        }

        Ok(None)
    }
}

#[async_trait]
impl LedgerRepository for PostgresLedgerRepository {
    /// Un intento del protocolo de escritura, en orden:
    /// reserva de idempotencia → lectura del snapshot → validación del
    /// balance → append al log → upsert del snapshot → finalización de la
    /// reserva → commit.
    async fn post_transaction(
        &self,
        posting: &NewPosting,
    ) -> Result<PostingOutcome, LedgerError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        // SET LOCAL no admite binds; los valores vienen de configuración.
        sqlx::query(&format!(
            "SET LOCAL lock_timeout = '{}ms'",
            self.lock_timeout_ms
        ))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;
        sqlx::query(&format!(
            "SET LOCAL statement_timeout = '{}ms'",
            self.statement_timeout_ms
        ))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        // La reserva ocurre antes de mover dinero: un duplicado aborta el
        // intento sin haber anexado nada al log.
        if let Some(key) = posting.idempotency_key.as_deref() {
            if let Some(receipt) = self.probe_and_reserve(&mut tx, key).await? {
                // Nada que comprometer; el drop del handle hace rollback.
                return Ok(PostingOutcome::Duplicate(receipt));
            }
        }

        let snapshot: Option<(i64, i32)> =
            sqlx::query_as("SELECT balance, version FROM accounts WHERE user_id = $1")
                .bind(posting.user_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        let (balance, _version) = snapshot.unwrap_or((0, 0));

        let new_balance = match posting.transaction_type {
            TransactionType::CREDIT => balance + posting.amount,
            TransactionType::DEBIT => balance - posting.amount,
        };
        if new_balance < 0 {
            return Err(LedgerError::InsufficientBalance {
                current_balance: balance,
                requested_amount: posting.amount,
            });
        }

        let model = sqlx::query_as::<_, TransactionModel>(
            r#"
            INSERT INTO transactions (id, user_id, type, amount, idempotency_key, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING *
            "#,
        )
        .bind(TransactionId::new())
        .bind(posting.user_id)
        .bind(posting.transaction_type)
        .bind(posting.amount)
        .bind(posting.idempotency_key.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        // Upsert del snapshot en UNA sentencia: dos primeras transacciones
        // de un usuario nuevo no pueden insertar la cuenta por partida
        // doble.
        sqlx::query(
            r#"
            INSERT INTO accounts (id, user_id, balance, version, created_at, updated_at)
            VALUES ($1, $2, $3, 1, NOW(), NOW())
            ON CONFLICT (user_id) DO UPDATE
                SET balance = EXCLUDED.balance,
                    version = accounts.version + 1,
                    updated_at = NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(posting.user_id)
        .bind(new_balance)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let transaction = Transaction::from(model);
        let receipt = TransactionReceipt::from(&transaction);

        if let Some(key) = posting.idempotency_key.as_deref() {
            let response = serde_json::to_string(&receipt)
                .map_err(|e| LedgerError::RepositoryError(e.to_string()))?;

            sqlx::query(
                r#"
                UPDATE idempotency_keys
                SET response = $2, expires_at = NOW() + INTERVAL '24 hours'
                WHERE key = $1
                "#,
            )
            .bind(key)
            .bind(response)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(PostingOutcome::Committed(receipt))
    }

    /// Historial del usuario ordenado por fecha de creación descendente.
    async fn find_by_user_id(
        &self,
        user_id: UserId,
        transaction_type: Option<TransactionType>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let models = match transaction_type {
            Some(t) => {
                sqlx::query_as::<_, TransactionModel>(
                    r#"
                    SELECT * FROM transactions
                    WHERE user_id = $1 AND type = $2
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(user_id)
                .bind(t)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, TransactionModel>(
                    r#"
                    SELECT * FROM transactions
                    WHERE user_id = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_sqlx_error)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    /// Camino rápido por el snapshot; un usuario sin snapshot cae a la
    /// fórmula general sobre el log (que da 0 para un usuario nuevo).
    async fn balance_for_user(&self, user_id: UserId) -> Result<i64, LedgerError> {
        let snapshot: Option<(i64,)> =
            sqlx::query_as("SELECT balance FROM accounts WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        if let Some((balance,)) = snapshot {
            return Ok(balance);
        }

        let (balance,): (i64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(CASE WHEN type = 'CREDIT' THEN amount ELSE -amount END), 0)::BIGINT
            FROM transactions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(balance)
    }

    /// Barre registros vencidos y reservas huérfanas. Las reservas de más
    /// de una hora superan por mucho el statement_timeout: nadie volverá a
    /// finalizarlas.
    async fn delete_expired_idempotency_keys(&self) -> Result<u64, LedgerError> {
        let result = sqlx::query(
            r#"
            DELETE FROM idempotency_keys
            WHERE expires_at < NOW()
               OR (response = $1 AND created_at < NOW() - INTERVAL '1 hour')
            "#,
        )
        .bind(PENDING_SENTINEL)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn database_status(&self) -> Result<DatabaseStatus, LedgerError> {
        let (version,): (String,) = sqlx::query_as("SELECT version()")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        // SHOW devuelve texto, no entero.
        let (max_connections,): (String,) = sqlx::query_as("SHOW max_connections")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(DatabaseStatus {
            version,
            max_connections: max_connections.parse().unwrap_or(0),
            open_connections: self.pool.size(),
        })
    }
}

// SQLSTATE 40001 es el único código que habilita reintento; todo lo demás
// sube como error de repositorio.
fn map_sqlx_error(e: sqlx::Error) -> LedgerError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.code().as_deref() == Some("40001") {
            return LedgerError::SerializationConflict;
        }
    }
    LedgerError::RepositoryError(e.to_string())
}
