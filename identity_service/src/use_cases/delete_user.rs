use crate::domain::error::UserError;
use crate::domain::repository::UserRepository;
use crate::domain::types::UserId;
use std::sync::Arc;

/// Caso de uso para que un usuario elimine su propia cuenta.
#[derive(Clone)]
pub struct DeleteUserUseCase {
    user_repo: Arc<dyn UserRepository>,
}

impl DeleteUserUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    #[tracing::instrument(name = "DeleteUserUseCase::execute", skip(self))]
    pub async fn execute(&self, principal: UserId, target: UserId) -> Result<(), UserError> {
        if principal != target {
            return Err(UserError::Forbidden);
        }

        if !self.user_repo.delete(target).await? {
            return Err(UserError::NotFound(target));
        }

        Ok(())
    }
}
