use common::contracts::ValidateUserTokenResponse;

/// Caso de uso que valida tokens de usuario por cuenta de servicios pares.
///
/// La validación es puramente criptográfica: firma, expiración y claims
/// tipados. Un token inválido no es un error del endpoint, es una
/// respuesta `{valid: false}`.
#[derive(Clone)]
pub struct ValidateUserTokenUseCase {
    jwt_secret: String,
}

impl ValidateUserTokenUseCase {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    pub fn execute(&self, user_token: &str) -> ValidateUserTokenResponse {
        match common::jwt::decode_user_token(&self.jwt_secret, user_token) {
            Ok(claims) => ValidateUserTokenResponse::valid(claims.sub),
            Err(e) => {
                tracing::debug!("User token rejected: {}", e);
                ValidateUserTokenResponse::invalid()
            }
        }
    }
}
