use crate::domain::entities::User;
use crate::domain::error::UserError;
use crate::domain::types::UserId;
use async_trait::async_trait;

// Interface (Port) for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> Result<User, UserError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError>;
    /// Búsqueda por email con comparación exacta (case-sensitive).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
    async fn list(&self) -> Result<Vec<User>, UserError>;
    async fn update(&self, user: User) -> Result<User, UserError>;
    /// Retorna `false` si el usuario no existía.
    async fn delete(&self, id: UserId) -> Result<bool, UserError>;
}
