use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use tracing::warn;

use crate::domain::error::AuthError;
use crate::domain::gateways::IdentityGateway;
use crate::domain::types::UserId;

/// Guarda de autenticación: establece el principal de una petición
/// validando el bearer contra el Identity Service.
///
/// Los handlers protegidos la invocan como primer paso. El Ledger no
/// confía en ningún claim del token por su cuenta; la respuesta de
/// Identity es la autoritativa, y cualquier fallo de red o decodificación
/// cuenta como validación fallida.
pub async fn authenticate(
    headers: &HeaderMap,
    gateway: &dyn IdentityGateway,
) -> Result<UserId, AuthError> {
    let header_value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = common::jwt::bearer_token(header_value).ok_or(AuthError::InvalidToken)?;

    match gateway.validate_user_token(token).await {
        Ok(Some(user_id)) => Ok(user_id),
        Ok(None) => Err(AuthError::InvalidToken),
        Err(e) => {
            warn!("Identity validation call failed: {}", e);
            Err(AuthError::InvalidToken)
        }
    }
}
