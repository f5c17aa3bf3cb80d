use crate::domain::entities::User;
use crate::domain::error::UserError;
use crate::domain::repository::UserRepository;
use crate::domain::types::UserId;
use crate::infrastructure::persistence::models::UserModel;
use async_trait::async_trait;
use sqlx::PgPool;

/// Repositorio de Usuarios basado en PostgreSQL.
///
/// Implementa la interfaz de dominio `UserRepository` utilizando `sqlx` para
/// interactuar con la base de datos de manera asíncrona y segura (params
/// binding).
///
/// Esta capa actúa como un adaptador:
/// - Recibe entidades de dominio (`User`).
/// - Las convierte a modelos de persistencia (`UserModel`).
/// - Ejecuta consultas SQL.
/// - Devuelve entidades de dominio, aislando al núcleo de la lógica de la DB.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Crea una nueva instancia inyectando el pool de conexiones.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    /// Persiste un nuevo usuario en la base de datos.
    async fn create(&self, user: User) -> Result<User, UserError> {
        let model = UserModel::from(user);

        // Clonamos el email para el manejo de errores antes de mover 'model'
        let email_for_error = model.email.clone();

        let saved_model = sqlx::query_as::<_, UserModel>(
            r#"
            INSERT INTO users (
                id, email, password_hash, first_name, last_name, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(model.id)
        .bind(model.email)
        .bind(model.password_hash)
        .bind(model.first_name)
        .bind(model.last_name)
        .bind(model.created_at)
        .bind(model.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, email_for_error))?;

        Ok(saved_model.into())
    }

    /// Busca un usuario por su ID único.
    ///
    /// Retorna `None` si el usuario no existe, en lugar de un error.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        let model_opt = sqlx::query_as::<_, UserModel>(
            r#"
            SELECT * FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::RepositoryError(e.to_string()))?;

        Ok(model_opt.map(|m| m.into()))
    }

    /// Busca un usuario por email. La comparación es exacta: no se
    /// normaliza mayúsculas/minúsculas ni aquí ni en el INSERT.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let model_opt = sqlx::query_as::<_, UserModel>(
            r#"
            SELECT * FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::RepositoryError(e.to_string()))?;

        Ok(model_opt.map(|m| m.into()))
    }

    /// Lista todos los usuarios registrados, del más antiguo al más nuevo.
    async fn list(&self) -> Result<Vec<User>, UserError> {
        let models = sqlx::query_as::<_, UserModel>(
            r#"
            SELECT * FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::RepositoryError(e.to_string()))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    /// Actualiza los campos mutables de un usuario existente.
    async fn update(&self, user: User) -> Result<User, UserError> {
        let model = UserModel::from(user);
        let email_for_error = model.email.clone();

        let updated_model = sqlx::query_as::<_, UserModel>(
            r#"
            UPDATE users
            SET email = $1, password_hash = $2, first_name = $3, last_name = $4, updated_at = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(model.email)
        .bind(model.password_hash)
        .bind(model.first_name)
        .bind(model.last_name)
        .bind(model.updated_at)
        .bind(model.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, email_for_error))?;

        match updated_model {
            Some(m) => Ok(m.into()),
            None => Err(UserError::NotFound(model.id)),
        }
    }

    /// Elimina un usuario. Retorna `false` si no había fila que borrar.
    async fn delete(&self, id: UserId) -> Result<bool, UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::RepositoryError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

// Postgres reporta duplicados con SQLSTATE 23505; el nombre del constraint
// distingue qué columna chocó.
fn map_unique_violation(e: sqlx::Error, email: String) -> UserError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.code().as_deref() == Some("23505")
            && db_err.message().contains("users_email_key")
        {
            return UserError::EmailTaken(email);
        }
    }
    UserError::RepositoryError(e.to_string())
}
