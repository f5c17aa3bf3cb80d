use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use mockall::mock;
use std::sync::Arc;
use uuid::Uuid;

use ledger_service::api::http_routes::{
    get_balance, list_transactions, post_transaction, AppState, ListTransactionsQuery,
    PostTransactionRequest, IDEMPOTENCY_KEY_HEADER,
};
use ledger_service::domain::entities::{
    DatabaseStatus, NewPosting, Transaction, TransactionReceipt, TransactionType,
};
use ledger_service::domain::error::{AuthError, LedgerError};
use ledger_service::domain::gateways::IdentityGateway;
use ledger_service::domain::repository::{LedgerRepository, PostingOutcome};
use ledger_service::domain::types::{TransactionId, UserId};
use ledger_service::infrastructure::gateways::fake_identity_gateway::FakeIdentityGateway;
use ledger_service::use_cases::get_balance::GetBalanceUseCase;
use ledger_service::use_cases::get_status::GetStatusUseCase;
use ledger_service::use_cases::get_transactions::GetTransactionsUseCase;
use ledger_service::use_cases::post_transaction::PostTransactionUseCase;

mock! {
    pub LedgerRepositoryImpl {}

    #[async_trait]
    impl LedgerRepository for LedgerRepositoryImpl {
        async fn post_transaction(&self, posting: &NewPosting) -> Result<PostingOutcome, LedgerError>;
        async fn find_by_user_id(&self, user_id: UserId, transaction_type: Option<TransactionType>) -> Result<Vec<Transaction>, LedgerError>;
        async fn balance_for_user(&self, user_id: UserId) -> Result<i64, LedgerError>;
        async fn delete_expired_idempotency_keys(&self) -> Result<u64, LedgerError>;
        async fn database_status(&self) -> Result<DatabaseStatus, LedgerError>;
    }
}

mock! {
    pub IdentityGatewayImpl {}

    #[async_trait]
    impl IdentityGateway for IdentityGatewayImpl {
        async fn validate_user_token(&self, user_token: &str) -> Result<Option<UserId>, AuthError>;
    }
}

fn app_state(
    mock_repo: MockLedgerRepositoryImpl,
    gateway: Arc<dyn IdentityGateway>,
) -> Arc<AppState> {
    let repo: Arc<dyn LedgerRepository> = Arc::new(mock_repo);

    Arc::new(AppState {
        post_transaction_use_case: PostTransactionUseCase::new(repo.clone()),
        get_transactions_use_case: GetTransactionsUseCase::new(repo.clone()),
        get_balance_use_case: GetBalanceUseCase::new(repo.clone()),
        get_status_use_case: GetStatusUseCase::new(repo),
        identity_gateway: gateway,
    })
}

fn bearer_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer user-token"));
    headers
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_credit_then_balance_happy_path() {
    // Arrange
    let user_id = UserId(Uuid::new_v4());
    let mut mock_repo = MockLedgerRepositoryImpl::new();

    mock_repo
        .expect_post_transaction()
        .withf(move |p: &NewPosting| {
            p.user_id == user_id
                && p.amount == 50_000
                && p.transaction_type == TransactionType::CREDIT
        })
        .times(1)
        .returning(|p| {
            Ok(PostingOutcome::Committed(TransactionReceipt {
                id: TransactionId::new(),
                user_id: p.user_id,
                amount: p.amount,
                transaction_type: p.transaction_type,
            }))
        });
    mock_repo
        .expect_balance_for_user()
        .times(1)
        .returning(|_| Ok(50_000));

    let state = app_state(mock_repo, Arc::new(FakeIdentityGateway::new(user_id)));

    // Act: postear el abono
    let Json(receipt) = post_transaction(
        State(state.clone()),
        bearer_headers(),
        Json(PostTransactionRequest {
            amount: 50_000,
            transaction_type: TransactionType::CREDIT,
        }),
    )
    .await
    .unwrap();

    // Assert
    assert_eq!(receipt.amount, 50_000);
    assert_eq!(receipt.user_id, user_id);
    assert_eq!(receipt.transaction_type, TransactionType::CREDIT);

    // Act: leer el balance
    let Json(balance) = get_balance(State(state), bearer_headers()).await.unwrap();
    assert_eq!(balance.amount, 50_000);
}

#[tokio::test]
async fn test_overdraft_returns_insufficient_balance_details() {
    let user_id = UserId(Uuid::new_v4());
    let mut mock_repo = MockLedgerRepositoryImpl::new();

    mock_repo.expect_post_transaction().times(1).returning(|_| {
        Err(LedgerError::InsufficientBalance {
            current_balance: 0,
            requested_amount: 1,
        })
    });

    let state = app_state(mock_repo, Arc::new(FakeIdentityGateway::new(user_id)));

    let err = post_transaction(
        State(state),
        bearer_headers(),
        Json(PostTransactionRequest {
            amount: 1,
            transaction_type: TransactionType::DEBIT,
        }),
    )
    .await
    .unwrap_err();

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_string(response).await;
    assert!(body.contains("INSUFFICIENT_BALANCE"));
    assert!(body.contains("\"shortage\":1"));
}

#[tokio::test]
async fn test_idempotent_replay_returns_original_receipt() {
    let user_id = UserId(Uuid::new_v4());
    let original_id = TransactionId::new();
    let mut mock_repo = MockLedgerRepositoryImpl::new();

    mock_repo
        .expect_post_transaction()
        .withf(|p: &NewPosting| p.idempotency_key.as_deref() == Some("k1"))
        .times(1)
        .returning(move |p| {
            Ok(PostingOutcome::Duplicate(TransactionReceipt {
                id: original_id,
                user_id: p.user_id,
                amount: 1_500,
                transaction_type: TransactionType::CREDIT,
            }))
        });

    let state = app_state(mock_repo, Arc::new(FakeIdentityGateway::new(user_id)));

    let mut headers = bearer_headers();
    headers.insert(IDEMPOTENCY_KEY_HEADER, HeaderValue::from_static("k1"));

    // El replay llega como 200 con el sobre original, no como error.
    let Json(receipt) = post_transaction(
        State(state),
        headers,
        Json(PostTransactionRequest {
            amount: 1_500,
            transaction_type: TransactionType::CREDIT,
        }),
    )
    .await
    .unwrap();

    assert_eq!(receipt.id, original_id);
    assert_eq!(receipt.amount, 1_500);
}

#[tokio::test]
async fn test_rejected_token_never_reaches_the_repository() {
    let mut mock_repo = MockLedgerRepositoryImpl::new();
    mock_repo.expect_post_transaction().times(0);

    let mut mock_gateway = MockIdentityGatewayImpl::new();
    mock_gateway
        .expect_validate_user_token()
        .times(1)
        .returning(|_| Ok(None));

    let state = app_state(mock_repo, Arc::new(mock_gateway));

    let err = post_transaction(
        State(state),
        bearer_headers(),
        Json(PostTransactionRequest {
            amount: 100,
            transaction_type: TransactionType::CREDIT,
        }),
    )
    .await
    .unwrap_err();

    assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_token_never_reaches_the_repository() {
    let mut mock_repo = MockLedgerRepositoryImpl::new();
    mock_repo.expect_post_transaction().times(0);

    let mut mock_gateway = MockIdentityGatewayImpl::new();
    mock_gateway.expect_validate_user_token().times(0);

    let state = app_state(mock_repo, Arc::new(mock_gateway));

    let err = post_transaction(
        State(state),
        HeaderMap::new(),
        Json(PostTransactionRequest {
            amount: 100,
            transaction_type: TransactionType::CREDIT,
        }),
    )
    .await
    .unwrap_err();

    assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_positive_amount_rejected_without_side_effects() {
    let user_id = UserId(Uuid::new_v4());
    let mut mock_repo = MockLedgerRepositoryImpl::new();
    mock_repo.expect_post_transaction().times(0);

    let state = app_state(mock_repo, Arc::new(FakeIdentityGateway::new(user_id)));

    let err = post_transaction(
        State(state),
        bearer_headers(),
        Json(PostTransactionRequest {
            amount: 0,
            transaction_type: TransactionType::CREDIT,
        }),
    )
    .await
    .unwrap_err();

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(response).await.contains("INVALID_AMOUNT"));
}

#[tokio::test]
async fn test_history_is_scoped_to_the_principal_and_filterable() {
    let user_id = UserId(Uuid::new_v4());
    let mut mock_repo = MockLedgerRepositoryImpl::new();

    mock_repo
        .expect_find_by_user_id()
        .withf(move |uid, filter| *uid == user_id && *filter == Some(TransactionType::CREDIT))
        .times(1)
        .returning(|uid, _| {
            Ok(vec![Transaction {
                id: TransactionId::new(),
                user_id: uid,
                transaction_type: TransactionType::CREDIT,
                amount: 1_000,
                idempotency_key: None,
                created_at: chrono::Utc::now(),
            }])
        });

    let state = app_state(mock_repo, Arc::new(FakeIdentityGateway::new(user_id)));

    let Json(transactions) = list_transactions(
        State(state),
        bearer_headers(),
        Query(ListTransactionsQuery {
            transaction_type: Some(TransactionType::CREDIT),
        }),
    )
    .await
    .unwrap();

    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].user_id, user_id);
}
