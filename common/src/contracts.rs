use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Tipos compartidos del endpoint de validación de tokens.
// El Ledger Service los serializa al llamar a Identity, e Identity los
// deserializa en su handler; viven aquí para que ambos lados usen
// exactamente el mismo contrato.

/// Cuerpo de la petición `POST /auth/validate-user-jwt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateUserTokenRequest {
    pub user_token: String,
}

/// Respuesta del endpoint de validación.
///
/// `user_id` solo está presente cuando `valid` es `true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateUserTokenResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

impl ValidateUserTokenResponse {
    pub fn valid(user_id: Uuid) -> Self {
        Self {
            valid: true,
            user_id: Some(user_id),
        }
    }

    pub fn invalid() -> Self {
        Self {
            valid: false,
            user_id: None,
        }
    }
}
