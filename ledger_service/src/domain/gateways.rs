use crate::domain::error::AuthError;
use crate::domain::types::UserId;
use async_trait::async_trait;

// Port hacia el Identity Service. El Ledger nunca decodifica el token de
// usuario por su cuenta: la palabra de Identity es la autoritativa.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Retorna `Ok(Some(user_id))` si Identity dio el token por válido,
    /// `Ok(None)` si lo rechazó, o un error si la llamada misma falló.
    async fn validate_user_token(&self, user_token: &str) -> Result<Option<UserId>, AuthError>;
}
