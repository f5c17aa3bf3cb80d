use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

use crate::domain::error::AuthError;
use crate::domain::types::UserId;

/// Guardas de autenticación de la capa HTTP.
///
/// Los handlers protegidos las invocan al inicio, antes de tocar ningún
/// caso de uso: `decode → authenticate → handle`. Hay dos clases de
/// token con secretos separados: el token de usuario emitido en el login
/// y el token servicio-a-servicio que protege el endpoint de validación.
#[derive(Clone)]
pub struct TokenAuthenticator {
    user_secret: String,
    service_secret: String,
}

impl TokenAuthenticator {
    pub fn new(user_secret: String, service_secret: String) -> Self {
        Self {
            user_secret,
            service_secret,
        }
    }

    /// Establece el principal de la petición desde el bearer de usuario.
    pub fn authenticate_user(&self, headers: &HeaderMap) -> Result<UserId, AuthError> {
        let token = extract_bearer(headers)?;

        let claims = common::jwt::decode_user_token(&self.user_secret, token)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(UserId(claims.sub))
    }

    /// Verifica que la petición venga de un servicio par (token con el
    /// flag `internal` firmado con el secreto interno).
    pub fn authenticate_service(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let token = extract_bearer(headers)?;

        common::jwt::decode_service_token(&self.service_secret, token)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(())
    }
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header_value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    common::jwt::bearer_token(header_value).ok_or(AuthError::InvalidToken)
}
