use crate::domain::entities::User;
use crate::domain::error::UserError;
use crate::domain::repository::UserRepository;
use std::sync::Arc;

/// Longitud mínima de contraseña aceptada en el registro.
const MIN_PASSWORD_LEN: usize = 6;

/// Caso de uso para registrar un nuevo usuario.
///
/// Valida la contraseña en claro, delega el resto de las reglas al
/// constructor de la entidad, calcula el digest bcrypt y persiste.
///
/// # Examples
/// ```ignore
/// use identity_service::use_cases::register_user::RegisterUserUseCase;
/// use identity_service::domain::repository::MockUserRepository;
/// use std::sync::Arc;
///
/// let repo = Arc::new(MockUserRepository::new());
/// let use_case = RegisterUserUseCase::new(repo);
/// ```
#[derive(Clone)]
pub struct RegisterUserUseCase {
    user_repo: Arc<dyn UserRepository>,
}

impl RegisterUserUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Ejecuta el registro.
    ///
    /// La contraseña nunca se persiste en claro: se transforma con bcrypt
    /// (cost de fábrica, 12) antes de construir la entidad.
    #[tracing::instrument(name = "RegisterUserUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        email: String,
        first_name: String,
        last_name: String,
        password: String,
    ) -> Result<User, UserError> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(UserError::InvalidData(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }

        let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
            .map_err(|e| UserError::HashingError(e.to_string()))?;

        let user = User::new(email, first_name, last_name, password_hash)?;

        self.user_repo.create(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockUserRepository;

    #[tokio::test]
    async fn test_register_success() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_create()
            .times(1)
            .returning(|user| Ok(user));

        let use_case = RegisterUserUseCase::new(Arc::new(mock_repo));
        let result = use_case
            .execute(
                "alice@example.com".to_string(),
                "Alice".to_string(),
                "Smith".to_string(),
                "secret-password".to_string(),
            )
            .await;

        let user = result.unwrap();
        assert_eq!(user.email(), "alice@example.com");
        // El digest nunca es la contraseña en claro.
        assert_ne!(user.password_hash(), "secret-password");
        assert!(user.password_hash().starts_with("$2"));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let mut mock_repo = MockUserRepository::new();
        // La validación corta el flujo antes de tocar el repositorio.
        mock_repo.expect_create().times(0);

        let use_case = RegisterUserUseCase::new(Arc::new(mock_repo));
        let result = use_case
            .execute(
                "alice@example.com".to_string(),
                "Alice".to_string(),
                "Smith".to_string(),
                "short".to_string(),
            )
            .await;

        assert!(matches!(result, Err(UserError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_email() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_create().times(0);

        let use_case = RegisterUserUseCase::new(Arc::new(mock_repo));
        let result = use_case
            .execute(
                "not-an-email".to_string(),
                "Alice".to_string(),
                "Smith".to_string(),
                "secret-password".to_string(),
            )
            .await;

        assert!(matches!(result, Err(UserError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_register_surfaces_email_conflict() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_create()
            .times(1)
            .returning(|user| Err(UserError::EmailTaken(user.email().to_string())));

        let use_case = RegisterUserUseCase::new(Arc::new(mock_repo));
        let result = use_case
            .execute(
                "taken@example.com".to_string(),
                "Alice".to_string(),
                "Smith".to_string(),
                "secret-password".to_string(),
            )
            .await;

        match result.unwrap_err() {
            UserError::EmailTaken(email) => assert_eq!(email, "taken@example.com"),
            other => panic!("Expected EmailTaken, got {:?}", other),
        }
    }
}
