use dotenvy::dotenv;
use identity_service::{
    api::{
        auth::TokenAuthenticator,
        http_routes::{routes, AppState},
    },
    config::Config,
    infrastructure::persistence::user_repository::PostgresUserRepository,
    use_cases::{
        delete_user::DeleteUserUseCase, get_user::GetUserUseCase, get_users::GetUsersUseCase,
        login_user::LoginUserUseCase, register_user::RegisterUserUseCase,
        update_user::UpdateUserUseCase, validate_user_token::ValidateUserTokenUseCase,
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
        identity_service::api::http_routes::register_user,
        identity_service::api::http_routes::login,
        identity_service::api::http_routes::list_users,
        identity_service::api::http_routes::get_user,
        identity_service::api::http_routes::update_user,
        identity_service::api::http_routes::delete_user
    ),
    components(schemas(
        identity_service::api::http_routes::RegisterUserRequest,
        identity_service::api::http_routes::LoginRequest,
        identity_service::api::http_routes::UpdateUserRequest,
        identity_service::api::response::UserView,
        identity_service::api::response::LoginResponse
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

    info!("Starting Identity Service...");

    // 3. Configurar Conexión a Base de Datos
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    info!("Connected to Database");

    // 4. Instanciar Dependencias (Infraestructura)
    let user_repo = Arc::new(PostgresUserRepository::new(pool));

    // 5. Instanciar Casos de Uso
    let register_user_use_case = RegisterUserUseCase::new(user_repo.clone());
    let login_user_use_case =
        LoginUserUseCase::new(user_repo.clone(), config.jwt_secret.clone());
    let get_users_use_case = GetUsersUseCase::new(user_repo.clone());
    let get_user_use_case = GetUserUseCase::new(user_repo.clone());
    let update_user_use_case = UpdateUserUseCase::new(user_repo.clone());
    let delete_user_use_case = DeleteUserUseCase::new(user_repo.clone());
    let validate_user_token_use_case = ValidateUserTokenUseCase::new(config.jwt_secret.clone());

    // 6. Configurar Estado de la App Axum
    let app_state = Arc::new(AppState {
        register_user_use_case,
        login_user_use_case,
        get_users_use_case,
        get_user_use_case,
        update_user_use_case,
        delete_user_use_case,
        validate_user_token_use_case,
        authenticator: TokenAuthenticator::new(
            config.jwt_secret.clone(),
            config.internal_jwt_secret.clone(),
        ),
    });

    // 7. Configurar Rutas y Servidor
    let app = routes(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let addr = config.bind_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
