pub mod auth;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::openapi::api_doc;
use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Auth endpoints, relative to the configured base path.
fn auth_routes() -> Router<ServerState> {
    Router::new()
        .route("/config", get(auth::config))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Build the full application router. `base_path` is either empty or a
/// normalized prefix such as `/api/auth`.
pub fn build_router(state: ServerState, cors: CorsLayer, base_path: &str) -> Router {
    let doc = Arc::new(api_doc(base_path));
    let public = Router::new()
        .route("/health", get(health))
        .route(
            "/api-docs/openapi.json",
            get(move || {
                let doc = Arc::clone(&doc);
                async move { Json(doc.as_ref().clone()) }
            }),
        );

    let app = if base_path.is_empty() {
        public.merge(auth_routes())
    } else {
        public.nest(base_path, auth_routes())
    };

    app.with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx responses are logged at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
