use crate::domain::types::UserId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User not found with ID: {0}")]
    NotFound(UserId),

    #[error("User already exists with email: {0}")]
    EmailTaken(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Principal does not own the target user")]
    Forbidden,

    #[error("Invalid user data: {0}")]
    InvalidData(String),

    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Token minting failed: {0}")]
    TokenError(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Fallos de autenticación en la capa HTTP. Todos terminan en 401;
/// distinguirlos ayuda al logging, no al cliente.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid bearer token")]
    InvalidToken,
}
