use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Transaction amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("Insufficient balance: requested {requested_amount} with {current_balance} available")]
    InsufficientBalance {
        current_balance: i64,
        requested_amount: i64,
    },

    /// La base de datos no pudo ordenar el commit en ninguna agenda serial
    /// (SQLSTATE 40001). Reintentar la transacción completa es seguro.
    #[error("Serialization conflict, the attempt must be retried")]
    SerializationConflict,

    #[error("Gave up after {0} conflicting attempts")]
    RetriesExhausted(u32),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Fallos al establecer el principal de una petición. Para el cliente
/// todos son 401; la distinción alimenta el logging.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Token rejected by the identity service")]
    InvalidToken,

    #[error("Identity gateway error: {0}")]
    GatewayError(String),
}
