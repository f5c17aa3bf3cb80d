use crate::domain::entities::User;
use crate::domain::error::UserError;
use crate::domain::repository::UserRepository;
use std::sync::Arc;

/// Caso de uso para autenticar credenciales y emitir el token de acceso.
///
/// Un email desconocido y una contraseña incorrecta producen exactamente el
/// mismo error, para no revelar qué cuentas existen.
#[derive(Clone)]
pub struct LoginUserUseCase {
    user_repo: Arc<dyn UserRepository>,
    jwt_secret: String,
}

impl LoginUserUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt_secret: String) -> Self {
        Self {
            user_repo,
            jwt_secret,
        }
    }

    /// Verifica las credenciales y retorna el usuario junto con un token
    /// HS256 de una hora de vigencia.
    #[tracing::instrument(name = "LoginUserUseCase::execute", skip(self, password))]
    pub async fn execute(&self, email: &str, password: &str) -> Result<(User, String), UserError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let matches = bcrypt::verify(password, user.password_hash())
            .map_err(|e| UserError::HashingError(e.to_string()))?;

        if !matches {
            return Err(UserError::InvalidCredentials);
        }

        let token = common::jwt::mint_user_token(&self.jwt_secret, user.id().0, user.email())
            .map_err(|e| UserError::TokenError(e.to_string()))?;

        Ok((user, token))
    }
}
