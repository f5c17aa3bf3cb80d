use dotenvy::dotenv;
use ledger_service::{
    api::http_routes::{routes, AppState},
    config::Config,
    infrastructure::{
        gateways::http_identity_gateway::HttpIdentityGateway,
        persistence::ledger_repository::PostgresLedgerRepository,
    },
    use_cases::{
        get_balance::GetBalanceUseCase, get_status::GetStatusUseCase,
        get_transactions::GetTransactionsUseCase, post_transaction::PostTransactionUseCase,
    },
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        ledger_service::api::http_routes::post_transaction,
        ledger_service::api::http_routes::list_transactions,
        ledger_service::api::http_routes::get_balance,
        ledger_service::api::http_routes::get_status
    ),
    components(schemas(
        ledger_service::api::http_routes::PostTransactionRequest,
        ledger_service::api::response::BalanceResponse,
        ledger_service::api::response::StatusResponse,
        ledger_service::api::response::DatabaseStatusView
    ))
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Cargar variables de entorno
    dotenv().ok();
    let config = Config::from_env()?;

    // 2. Configurar Logging/Tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting Ledger Service...");

    // 3. Configurar Conexión a Base de Datos
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    info!("Connected to Database");

    // 4. Instanciar Dependencias (Infraestructura)
    let ledger_repo = Arc::new(PostgresLedgerRepository::with_timeouts(
        pool,
        config.lock_timeout_ms,
        config.statement_timeout_ms,
    ));
    let identity_gateway = Arc::new(HttpIdentityGateway::new(
        config.identity_url.clone(),
        config.internal_jwt_secret.clone(),
    ));

    // 5. Instanciar Casos de Uso
    let post_transaction_use_case = PostTransactionUseCase::new(ledger_repo.clone());
    let get_transactions_use_case = GetTransactionsUseCase::new(ledger_repo.clone());
    let get_balance_use_case = GetBalanceUseCase::new(ledger_repo.clone());
    let get_status_use_case = GetStatusUseCase::new(ledger_repo.clone());

    // 6. Configurar Estado de la App Axum
    let app_state = Arc::new(AppState {
        post_transaction_use_case,
        get_transactions_use_case,
        get_balance_use_case,
        get_status_use_case,
        identity_gateway,
    });

    // 7. Iniciar el barrido de idempotencia en segundo plano
    let sweeper_repo = ledger_repo.clone();
    let sweeper_interval = config.sweeper_interval_secs;

    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(sweeper_interval));
        let job = ledger_service::jobs::sweeper::IdempotencySweeperJob::new(sweeper_repo);

        info!("Idempotency sweeper started (every {}s)", sweeper_interval);

        loop {
            interval.tick().await;
            job.run().await;
        }
    });

    // 8. Configurar Rutas y Servidor
    let app = routes(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let addr = config.bind_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
