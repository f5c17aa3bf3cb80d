use crate::domain::entities::User;
use crate::domain::error::UserError;
use crate::domain::repository::UserRepository;
use crate::domain::types::UserId;
use std::sync::Arc;

/// Caso de uso para leer un usuario puntual.
///
/// Solo el dueño puede leerse a sí mismo: un principal distinto del target
/// recibe `Forbidden` sin tocar el repositorio.
#[derive(Clone)]
pub struct GetUserUseCase {
    user_repo: Arc<dyn UserRepository>,
}

impl GetUserUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    #[tracing::instrument(name = "GetUserUseCase::execute", skip(self))]
    pub async fn execute(&self, principal: UserId, target: UserId) -> Result<User, UserError> {
        if principal != target {
            return Err(UserError::Forbidden);
        }

        self.user_repo
            .find_by_id(target)
            .await?
            .ok_or(UserError::NotFound(target))
    }
}
