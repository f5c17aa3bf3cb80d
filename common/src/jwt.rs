use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Vigencia de los tokens de usuario emitidos en el login.
pub const USER_TOKEN_TTL_SECS: i64 = 3600;

/// Vigencia de los tokens servicio-a-servicio. Se acuñan por petición,
/// así que un minuto es más que suficiente.
pub const SERVICE_TOKEN_TTL_SECS: i64 = 60;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

/// Claims del token de usuario (HS256).
///
/// Son los claims que Identity firma en el login y que el endpoint de
/// validación verifica. La deserialización tipada rechaza tokens sin
/// `sub` o sin `email`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Claims del token servicio-a-servicio (HS256, secreto separado).
///
/// El flag `internal` distingue estos tokens de cualquier otro firmado
/// por error con el mismo secreto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceClaims {
    pub internal: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Firma un token de usuario con vigencia de una hora.
pub fn mint_user_token(secret: &str, user_id: Uuid, email: &str) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = UserClaims {
        sub: user_id,
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(USER_TOKEN_TTL_SECS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Decodifica y valida un token de usuario: firma, expiración y presencia
/// de `sub`/`email`.
pub fn decode_user_token(secret: &str, token: &str) -> Result<UserClaims, TokenError> {
    let token_data: TokenData<UserClaims> = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &strict_validation(),
    )
    .map_err(map_decode_error)?;

    Ok(token_data.claims)
}

/// Firma un token servicio-a-servicio con vigencia de un minuto.
pub fn mint_service_token(secret: &str) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = ServiceClaims {
        internal: true,
        iat: now.timestamp(),
        exp: (now + Duration::seconds(SERVICE_TOKEN_TTL_SECS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Decodifica un token servicio-a-servicio y exige el flag `internal`.
pub fn decode_service_token(secret: &str, token: &str) -> Result<ServiceClaims, TokenError> {
    let token_data: TokenData<ServiceClaims> = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &strict_validation(),
    )
    .map_err(map_decode_error)?;

    if !token_data.claims.internal {
        return Err(TokenError::Invalid);
    }

    Ok(token_data.claims)
}

/// Extrae el token de un header `Authorization: Bearer <token>`.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ")
}

// Sin leeway: un token servicio-a-servicio de 60s no debe vivir 120s.
fn strict_validation() -> Validation {
    let mut validation = Validation::default();
    validation.leeway = 0;
    validation
}

fn map_decode_error(e: jsonwebtoken::errors::Error) -> TokenError {
    match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";
    const OTHER_SECRET: &str = "a-different-secret";

    #[test]
    fn test_user_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = mint_user_token(SECRET, user_id, "alice@example.com").unwrap();

        let claims = decode_user_token(SECRET, &token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "alice@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_user_token_rejects_wrong_secret() {
        let token = mint_user_token(SECRET, Uuid::new_v4(), "alice@example.com").unwrap();

        let result = decode_user_token(OTHER_SECRET, &token);

        assert_eq!(result.unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_user_token_rejects_garbage() {
        let result = decode_user_token(SECRET, "not.a.token");

        assert_eq!(result.unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_user_token_rejects_missing_claims() {
        // Un token de servicio no tiene `sub` ni `email`; la decodificación
        // tipada debe rechazarlo aunque la firma sea válida.
        let token = mint_service_token(SECRET).unwrap();

        let result = decode_user_token(SECRET, &token);

        assert_eq!(result.unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_service_token_round_trip() {
        let token = mint_service_token(SECRET).unwrap();

        let claims = decode_service_token(SECRET, &token).unwrap();

        assert!(claims.internal);
        assert_eq!(claims.exp - claims.iat, SERVICE_TOKEN_TTL_SECS);
    }

    #[test]
    fn test_service_token_rejects_internal_false() {
        let now = Utc::now();
        let claims = ServiceClaims {
            internal: false,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(60)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = decode_service_token(SECRET, &token);

        assert_eq!(result.unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now();
        let claims = UserClaims {
            sub: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = decode_user_token(SECRET, &token);

        assert_eq!(result.unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("abc.def.ghi"), None);
    }
}
