use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use istudio_core::errors::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::{
    MessageResponse, RefreshRequest, RefreshResponse, SessionResponse, SignInRequest,
    SignInResponse,
};
use crate::modules::auth::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in successfully", body = SignInResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SignInRequest>,
) -> Result<Json<SignInResponse>, AppError> {
    let response = AuthService::sign_in(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Recover a session with a refresh token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair issued", body = RefreshResponse),
        (status = 401, description = "Refresh token invalid or account gone", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let response =
        AuthService::refresh_session(&state.db, &dto.refresh_token, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Re-validate the current session
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Whether the session is still valid", body = SessionResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, auth_user))]
pub async fn check_session(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<SessionResponse>, AppError> {
    let valid =
        AuthService::check_session(&state.db, auth_user.user_id()?, auth_user.role()).await?;
    Ok(Json(SessionResponse { valid }))
}

/// Sign out
///
/// Tokens are stateless, so sign-out is client-side discard; the endpoint
/// exists so clients have a single place to hook teardown.
#[utoipa::path(
    post,
    path = "/api/auth/sign-out",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(_auth_user))]
pub async fn sign_out(_auth_user: AuthUser) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Signed out".to_string(),
    })
}
