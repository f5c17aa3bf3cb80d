use crate::domain::entities::User;
use crate::domain::error::UserError;
use crate::domain::repository::UserRepository;
use std::sync::Arc;

/// Caso de uso para listar los usuarios registrados.
#[derive(Clone)]
pub struct GetUsersUseCase {
    user_repo: Arc<dyn UserRepository>,
}

impl GetUsersUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    #[tracing::instrument(name = "GetUsersUseCase::execute", skip(self))]
    pub async fn execute(&self) -> Result<Vec<User>, UserError> {
        self.user_repo.list().await
    }
}
