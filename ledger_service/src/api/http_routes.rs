use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::auth::authenticate;
use crate::api::error::ApiError;
use crate::api::response::{BalanceResponse, StatusResponse};
use crate::domain::entities::{Transaction, TransactionReceipt, TransactionType};
use crate::domain::gateways::IdentityGateway;
use crate::use_cases::{
    get_balance::GetBalanceUseCase, get_status::GetStatusUseCase,
    get_transactions::GetTransactionsUseCase, post_transaction::PostTransactionUseCase,
};

/// Header opcional que liga un posteo a un único efecto en el servidor.
pub const IDEMPOTENCY_KEY_HEADER: &str = "x-idempotency-key";

// Estado compartido de la aplicación
pub struct AppState {
    pub post_transaction_use_case: PostTransactionUseCase,
    pub get_transactions_use_case: GetTransactionsUseCase,
    pub get_balance_use_case: GetBalanceUseCase,
    pub get_status_use_case: GetStatusUseCase,
    pub identity_gateway: Arc<dyn IdentityGateway>,
}

pub fn routes(state: Arc<AppState>) -> Router {
    let v1 = Router::new()
        .route("/transactions", post(post_transaction).get(list_transactions))
        .route("/balance", get(get_balance))
        .route("/status", get(get_status))
        .with_state(state);

    Router::new().nest("/api/v1", v1)
}

// DTO de entrada para postear un movimiento
#[derive(Deserialize, ToSchema)]
pub struct PostTransactionRequest {
    /// Centavos, entero positivo.
    pub amount: i64,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "CREDIT")]
    pub transaction_type: TransactionType,
}

// Filtro opcional del historial
#[derive(Deserialize)]
pub struct ListTransactionsQuery {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
}

// Handler: Postear un abono o cargo contra el balance del principal
// POST /api/v1/transactions
// Header opcional: x-idempotency-key. Reusar una clave replica la
// respuesta original (200), aunque el cuerpo haya cambiado.
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    request_body = PostTransactionRequest,
    responses(
        (status = 200, description = "Movimiento comprometido, o replay idempotente del original"),
        (status = 400, description = "Monto inválido o balance insuficiente"),
        (status = 401, description = "Token ausente o rechazado por Identity")
    )
)]
pub async fn post_transaction(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<PostTransactionRequest>,
) -> Result<Json<TransactionReceipt>, ApiError> {
    let principal = authenticate(&headers, state.identity_gateway.as_ref()).await?;

    let idempotency_key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let receipt = state
        .post_transaction_use_case
        .execute(
            principal,
            payload.transaction_type,
            payload.amount,
            idempotency_key,
        )
        .await?;

    Ok(Json(receipt))
}

// Handler: Historial de movimientos del principal, el más reciente primero
// GET /api/v1/transactions?type=CREDIT|DEBIT
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    params(("type" = Option<String>, Query, description = "Filtrar por CREDIT o DEBIT")),
    responses(
        (status = 200, description = "Movimientos del principal"),
        (status = 401, description = "Token ausente o rechazado por Identity")
    )
)]
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let principal = authenticate(&headers, state.identity_gateway.as_ref()).await?;

    let transactions = state
        .get_transactions_use_case
        .execute(principal, query.transaction_type)
        .await?;

    Ok(Json(transactions))
}

// Handler: Balance consolidado del principal
// GET /api/v1/balance
#[utoipa::path(
    get,
    path = "/api/v1/balance",
    responses(
        (status = 200, description = "Balance en centavos", body = BalanceResponse),
        (status = 401, description = "Token ausente o rechazado por Identity")
    )
)]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<BalanceResponse>, ApiError> {
    let principal = authenticate(&headers, state.identity_gateway.as_ref()).await?;

    let amount = state.get_balance_use_case.execute(principal).await?;

    Ok(Json(BalanceResponse { amount }))
}

// Handler: Salud de las dependencias
// GET /api/v1/status
#[utoipa::path(
    get,
    path = "/api/v1/status",
    responses(
        (status = 200, description = "Estado de la base de datos", body = StatusResponse)
    )
)]
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let status = state.get_status_use_case.execute().await?;

    Ok(Json(StatusResponse::from(status)))
}
