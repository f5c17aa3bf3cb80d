use chrono::{DateTime, Utc};

use crate::domain::error::UserError;
use crate::domain::types::UserId;

/// Modelo de Entidad: User.
///
/// Representa a un usuario dentro del sistema con sus datos de identidad y
/// el digest de su contraseña. La entidad nunca expone el digest por
/// serialización: no implementa `Serialize` a propósito, las respuestas
/// HTTP usan un DTO dedicado.
///
/// # Examples
/// ```
/// use identity_service::domain::entities::User;
///
/// let user = User::new(
///     "john@example.com".to_string(),
///     "John".to_string(),
///     "Doe".to_string(),
///     "$2b$12$fakedigest".to_string(),
/// )
/// .unwrap();
/// assert_eq!(user.email(), "john@example.com");
/// ```
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    email: String, // Unique
    password_hash: String,
    first_name: String,
    last_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Inicializa una nueva instancia válida de `User`.
    ///
    /// Valida el formato del email y la longitud mínima de los nombres.
    /// El `password_hash` llega ya calculado: la entidad no conoce la
    /// contraseña en claro.
    pub fn new(
        email: String,
        first_name: String,
        last_name: String,
        password_hash: String,
    ) -> Result<Self, UserError> {
        validate_email(&email)?;
        validate_name("first_name", &first_name)?;
        validate_name("last_name", &last_name)?;

        let now = Utc::now();
        Ok(Self {
            id: UserId::new(),
            email,
            password_hash,
            first_name,
            last_name,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstruye una instancia de `User` desde los datos persistidos.
    ///
    /// Los datos que vienen de la base ya pasaron por `new` en su momento,
    /// así que la reconstrucción no re-valida.
    pub fn reconstitute(
        id: UserId,
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            first_name,
            last_name,
            created_at,
            updated_at,
        }
    }

    /// Produce una copia con los campos presentes reemplazados, re-validando
    /// las reglas de dominio y refrescando `updated_at`.
    pub fn with_changes(
        &self,
        email: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        password_hash: Option<String>,
    ) -> Result<Self, UserError> {
        let email = email.unwrap_or_else(|| self.email.clone());
        let first_name = first_name.unwrap_or_else(|| self.first_name.clone());
        let last_name = last_name.unwrap_or_else(|| self.last_name.clone());
        let password_hash = password_hash.unwrap_or_else(|| self.password_hash.clone());

        validate_email(&email)?;
        validate_name("first_name", &first_name)?;
        validate_name("last_name", &last_name)?;

        Ok(Self {
            id: self.id,
            email,
            password_hash,
            first_name,
            last_name,
            created_at: self.created_at,
            updated_at: Utc::now(),
        })
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn validate_email(email: &str) -> Result<(), UserError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') || trimmed.starts_with('@') {
        return Err(UserError::InvalidData(format!(
            "Email is not well-formed: {}",
            email
        )));
    }
    Ok(())
}

fn validate_name(field: &str, value: &str) -> Result<(), UserError> {
    if value.trim().len() < 2 {
        return Err(UserError::InvalidData(format!(
            "Field {} must be at least 2 characters long",
            field
        )));
    }
    Ok(())
}
