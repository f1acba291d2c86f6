use std::sync::Arc;

use axum::{extract::{rejection::JsonRejection, State}, Json};
use tracing::warn;

use service::auth::{
    domain::{AuthResult, AuthStrategy, LoginInput, RegisterInput},
    AuthError, AuthService,
};

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService>,
}

#[utoipa::path(get, path = "/config", tag = "auth", responses((status = 200, description = "Login strategy", body = crate::openapi::StrategyResponse)))]
pub async fn config(State(state): State<ServerState>) -> Json<AuthStrategy> {
    Json(state.auth.strategy())
}

#[utoipa::path(post, path = "/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Registered", body = crate::openapi::AuthResultDoc), (status = 400, description = "User already exists or invalid input", body = crate::openapi::MessageResponse)))]
pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<Json<AuthResult>, ApiError> {
    let Json(input) = payload?;
    let result = state.auth.register(input).await?;
    Ok(Json(result))
}

#[utoipa::path(post, path = "/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in", body = crate::openapi::AuthResultDoc), (status = 400, description = "Email or password is incorrect", body = crate::openapi::MessageResponse)))]
pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<AuthResult>, ApiError> {
    // Unreadable login bodies fail the same way as bad credentials.
    let Json(input) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected login body");
        AuthError::Unauthorized
    })?;
    let result = state.auth.login(input).await?;
    Ok(Json(result))
}
