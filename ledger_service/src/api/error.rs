use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::error::{AuthError, LedgerError};

// Error unificado de la API del Ledger Service.
#[derive(Debug)]
pub enum ApiError {
    Ledger(LedgerError),
    Auth(AuthError),
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::Ledger(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Ledger(LedgerError::InvalidAmount(amount)) => error_response(
                StatusCode::BAD_REQUEST,
                "INVALID_AMOUNT",
                format!("Transaction amount must be positive, got {}", amount),
                None,
            ),
            ApiError::Ledger(LedgerError::InsufficientBalance {
                current_balance,
                requested_amount,
            }) => error_response(
                StatusCode::BAD_REQUEST,
                "INSUFFICIENT_BALANCE",
                "Debit would overdraw the account".to_string(),
                Some(json!({
                    "current_balance": current_balance,
                    "requested_amount": requested_amount,
                    "shortage": requested_amount - current_balance,
                })),
            ),
            ApiError::Ledger(err @ LedgerError::RetriesExhausted(_)) => {
                tracing::error!("Write path gave up: {}", err);
                internal_error()
            }
            // Un conflicto suelto hasta aquí es un bug del bucle de
            // reintentos; se reporta como interno igual que el resto.
            ApiError::Ledger(LedgerError::SerializationConflict) => {
                tracing::error!("Serialization conflict escaped the retry loop");
                internal_error()
            }
            ApiError::Ledger(LedgerError::RepositoryError(e)) => {
                tracing::error!("Ledger repository error: {}", e);
                internal_error()
            }
            ApiError::Auth(_) => error_response(
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Missing or invalid bearer token".to_string(),
                None,
            ),
        }
    }
}

fn error_response(
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<serde_json::Value>,
) -> Response {
    let body = match details {
        Some(details) => json!({
            "error": code,
            "message": message,
            "details": details,
        }),
        None => json!({
            "error": code,
            "message": message,
        }),
    };

    (status, Json(body)).into_response()
}

fn internal_error() -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "Internal server error".to_string(),
        None,
    )
}
