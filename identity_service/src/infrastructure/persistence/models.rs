use crate::domain::entities::User;
use crate::domain::types::UserId;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct UserModel {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserModel {
    fn from(u: User) -> Self {
        Self {
            id: u.id(),
            email: u.email().to_string(),
            password_hash: u.password_hash().to_string(),
            first_name: u.first_name().to_string(),
            last_name: u.last_name().to_string(),
            created_at: u.created_at(),
            updated_at: u.updated_at(),
        }
    }
}

impl From<UserModel> for User {
    fn from(m: UserModel) -> Self {
        User::reconstitute(
            m.id,
            m.email,
            m.password_hash,
            m.first_name,
            m.last_name,
            m.created_at,
            m.updated_at,
        )
    }
}
