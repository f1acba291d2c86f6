use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::MessageBody;
use service::auth::AuthError;
use thiserror::Error;
use tracing::{error, warn};

pub const MSG_USER_EXISTS: &str = "User already exists";
pub const MSG_INVALID_CREDENTIALS: &str = "Email or password is incorrect";
pub const MSG_INTERNAL: &str = "Internal server error";

/// Handler error. Every variant renders as `{"message": ...}`.
#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    BadRequest(String),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Auth(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Auth(AuthError::Conflict) => (StatusCode::BAD_REQUEST, MSG_USER_EXISTS.into()),
            ApiError::Auth(AuthError::Unauthorized) => (StatusCode::BAD_REQUEST, MSG_INVALID_CREDENTIALS.into()),
            ApiError::Auth(AuthError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Auth(_) => (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        match &self {
            ApiError::Auth(e) if !e.is_client_error() => error!(code = e.code(), error = %e, "auth request failed"),
            ApiError::BadRequest(msg) => warn!(error = %msg, "rejected request body"),
            _ => {}
        }
        (status, Json(MessageBody::new(message))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
