use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use common::contracts::{ValidateUserTokenRequest, ValidateUserTokenResponse};

use crate::api::auth::TokenAuthenticator;
use crate::api::error::ApiError;
use crate::api::response::{LoginResponse, UserView};
use crate::domain::types::UserId;
use crate::use_cases::{
    delete_user::DeleteUserUseCase,
    get_user::GetUserUseCase,
    get_users::GetUsersUseCase,
    login_user::LoginUserUseCase,
    register_user::RegisterUserUseCase,
    update_user::{UpdateUserUseCase, UserChanges},
    validate_user_token::ValidateUserTokenUseCase,
};

// Estado compartido de la aplicación
pub struct AppState {
    pub register_user_use_case: RegisterUserUseCase,
    pub login_user_use_case: LoginUserUseCase,
    pub get_users_use_case: GetUsersUseCase,
    pub get_user_use_case: GetUserUseCase,
    pub update_user_use_case: UpdateUserUseCase,
    pub delete_user_use_case: DeleteUserUseCase,
    pub validate_user_token_use_case: ValidateUserTokenUseCase,
    pub authenticator: TokenAuthenticator,
}

pub fn routes(state: Arc<AppState>) -> Router {
    let v1 = Router::new()
        .route("/users", post(register_user).get(list_users))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/auth", post(login))
        .route("/auth/validate-user-jwt", post(validate_user_jwt))
        .with_state(state);

    Router::new().nest("/api/v1", v1)
}

// DTO de entrada para el registro
#[derive(Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

// DTO de entrada para el login
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// DTO de entrada para la actualización parcial
#[derive(Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

// Handler: Registrar un usuario
// POST /api/v1/users
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Usuario creado", body = UserView),
        (status = 400, description = "Datos inválidos"),
        (status = 409, description = "Email ya registrado")
    )
)]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    let user = state
        .register_user_use_case
        .execute(
            payload.email,
            payload.first_name,
            payload.last_name,
            payload.password,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserView::from(&user))))
}

// Handler: Login con email y contraseña
// POST /api/v1/auth
#[utoipa::path(
    post,
    path = "/api/v1/auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credenciales válidas", body = LoginResponse),
        (status = 401, description = "Credenciales inválidas")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (user, access_token) = state
        .login_user_use_case
        .execute(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        user: UserView::from(&user),
        access_token,
    }))
}

// Handler: Validar un token de usuario por cuenta de un servicio par.
// POST /api/v1/auth/validate-user-jwt
// Protegido por bearer servicio-a-servicio; no aparece en swagger.
pub async fn validate_user_jwt(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<ValidateUserTokenRequest>,
) -> Result<Json<ValidateUserTokenResponse>, ApiError> {
    state.authenticator.authenticate_service(&headers)?;

    Ok(Json(
        state
            .validate_user_token_use_case
            .execute(&payload.user_token),
    ))
}

// Handler: Listar usuarios registrados
// GET /api/v1/users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Listado de usuarios", body = [UserView]),
        (status = 401, description = "Token ausente o inválido")
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserView>>, ApiError> {
    state.authenticator.authenticate_user(&headers)?;

    let users = state.get_users_use_case.execute().await?;

    Ok(Json(users.iter().map(UserView::from).collect()))
}

// Handler: Leer el propio usuario
// GET /api/v1/users/{id}
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "ID del usuario")),
    responses(
        (status = 200, description = "Usuario encontrado", body = UserView),
        (status = 403, description = "El principal no es el dueño"),
        (status = 404, description = "Usuario inexistente")
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<UserView>, ApiError> {
    let principal = state.authenticator.authenticate_user(&headers)?;

    let user = state
        .get_user_use_case
        .execute(principal, UserId(id))
        .await?;

    Ok(Json(UserView::from(&user)))
}

// Handler: Actualizar el propio usuario
// PATCH /api/v1/users/{id}
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "ID del usuario")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Usuario actualizado", body = UserView),
        (status = 403, description = "El principal no es el dueño"),
        (status = 409, description = "Email ya registrado")
    )
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserView>, ApiError> {
    let principal = state.authenticator.authenticate_user(&headers)?;

    let changes = UserChanges {
        email: payload.email,
        first_name: payload.first_name,
        last_name: payload.last_name,
        password: payload.password,
    };

    let user = state
        .update_user_use_case
        .execute(principal, UserId(id), changes)
        .await?;

    Ok(Json(UserView::from(&user)))
}

// Handler: Eliminar el propio usuario
// DELETE /api/v1/users/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "ID del usuario")),
    responses(
        (status = 204, description = "Usuario eliminado"),
        (status = 403, description = "El principal no es el dueño"),
        (status = 404, description = "Usuario inexistente")
    )
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let principal = state.authenticator.authenticate_user(&headers)?;

    state
        .delete_user_use_case
        .execute(principal, UserId(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
