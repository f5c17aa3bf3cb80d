use crate::domain::error::AuthError;
use crate::domain::gateways::IdentityGateway;
use crate::domain::types::UserId;
use async_trait::async_trait;
use common::contracts::{ValidateUserTokenRequest, ValidateUserTokenResponse};
use std::time::Duration;
use tracing::info;

/// Gateway HTTP hacia el endpoint de validación del Identity Service.
///
/// Por cada llamada acuña un token servicio-a-servicio de 60 segundos y lo
/// presenta como bearer; el token del usuario viaja en el cuerpo.
pub struct HttpIdentityGateway {
    client: reqwest::Client,
    identity_url: String,
    internal_jwt_secret: String,
}

impl HttpIdentityGateway {
    pub fn new(identity_url: String, internal_jwt_secret: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("HTTP client construction failed");

        Self {
            client,
            identity_url,
            internal_jwt_secret,
        }
    }
}

#[async_trait]
impl IdentityGateway for HttpIdentityGateway {
    async fn validate_user_token(&self, user_token: &str) -> Result<Option<UserId>, AuthError> {
        let service_token = common::jwt::mint_service_token(&self.internal_jwt_secret)
            .map_err(|e| AuthError::GatewayError(e.to_string()))?;

        let url = format!("{}/api/v1/auth/validate-user-jwt", self.identity_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(service_token)
            .json(&ValidateUserTokenRequest {
                user_token: user_token.to_string(),
            })
            .send()
            .await
            .map_err(|e| AuthError::GatewayError(format!("Identity request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AuthError::GatewayError(format!(
                "Identity answered {}",
                response.status()
            )));
        }

        let body: ValidateUserTokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::GatewayError(format!("Identity response malformed: {}", e)))?;

        if !body.valid {
            info!("Identity rejected a user token");
            return Ok(None);
        }

        Ok(body.user_id.map(UserId))
    }
}
