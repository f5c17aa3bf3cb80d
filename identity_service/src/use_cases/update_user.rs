use crate::domain::entities::User;
use crate::domain::error::UserError;
use crate::domain::repository::UserRepository;
use crate::domain::types::UserId;
use std::sync::Arc;

const MIN_PASSWORD_LEN: usize = 6;

/// Campos opcionales de una actualización parcial. Un campo ausente
/// conserva el valor actual.
#[derive(Debug, Default, Clone)]
pub struct UserChanges {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

/// Caso de uso para que un usuario modifique su propio registro.
#[derive(Clone)]
pub struct UpdateUserUseCase {
    user_repo: Arc<dyn UserRepository>,
}

impl UpdateUserUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Aplica los cambios. Si viene contraseña nueva se re-valida su
    /// longitud y se recalcula el digest; el resto de reglas las impone
    /// la entidad.
    #[tracing::instrument(name = "UpdateUserUseCase::execute", skip(self, changes))]
    pub async fn execute(
        &self,
        principal: UserId,
        target: UserId,
        changes: UserChanges,
    ) -> Result<User, UserError> {
        if principal != target {
            return Err(UserError::Forbidden);
        }

        let current = self
            .user_repo
            .find_by_id(target)
            .await?
            .ok_or(UserError::NotFound(target))?;

        let password_hash = match changes.password {
            Some(password) => {
                if password.len() < MIN_PASSWORD_LEN {
                    return Err(UserError::InvalidData(format!(
                        "Password must be at least {} characters long",
                        MIN_PASSWORD_LEN
                    )));
                }
                Some(
                    bcrypt::hash(&password, bcrypt::DEFAULT_COST)
                        .map_err(|e| UserError::HashingError(e.to_string()))?,
                )
            }
            None => None,
        };

        let updated = current.with_changes(
            changes.email,
            changes.first_name,
            changes.last_name,
            password_hash,
        )?;

        self.user_repo.update(updated).await
    }
}
