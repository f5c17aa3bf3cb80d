use crate::domain::error::AuthError;
use crate::domain::gateways::IdentityGateway;
use crate::domain::types::UserId;
use async_trait::async_trait;
use tracing::info;

/// Implementación fake del gateway de Identity para desarrollo y testing.
///
/// Da por válido cualquier token y siempre responde con el mismo usuario.
/// Útil para ejercitar el Ledger Service sin levantar Identity.
pub struct FakeIdentityGateway {
    user_id: UserId,
}

impl FakeIdentityGateway {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl IdentityGateway for FakeIdentityGateway {
    async fn validate_user_token(&self, _user_token: &str) -> Result<Option<UserId>, AuthError> {
        info!(
            " [FakeIdentityGateway] Accepting token as user {}",
            self.user_id
        );
        Ok(Some(self.user_id))
    }
}
