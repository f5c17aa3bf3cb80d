use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::error::{AuthError, UserError};

// Error unificado de la API del Identity Service.
#[derive(Debug)]
pub enum ApiError {
    User(UserError),
    Auth(AuthError),
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        ApiError::User(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::User(err) => match err {
                UserError::InvalidData(_) => {
                    (StatusCode::BAD_REQUEST, "INVALID_INPUT", err.to_string())
                }
                UserError::EmailTaken(_) => {
                    (StatusCode::CONFLICT, "EMAIL_CONFLICT", err.to_string())
                }
                UserError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    err.to_string(),
                ),
                UserError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string()),
                UserError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                UserError::RepositoryError(ref e)
                | UserError::HashingError(ref e)
                | UserError::TokenError(ref e) => {
                    tracing::error!("Internal identity error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "Internal server error".to_string(),
                    )
                }
            },
            ApiError::Auth(_) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Missing or invalid bearer token".to_string(),
            ),
        };

        let body = Json(json!({
            "error": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}
