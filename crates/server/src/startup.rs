use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};
use service::auth::{
    repo::seaorm::SeaOrmUserRepository,
    repository::{memory::InMemoryUserRepository, UserRepository},
    AuthService,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Pick the user store backend and wire the auth service.
/// An empty `database.url` selects the in-memory store.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let repo: Arc<dyn UserRepository> = if cfg.database.is_configured() {
        let db = models::db::connect_with_config(&cfg.database).await?;
        if cfg.database.run_migrations {
            migration::Migrator::up(&db, None)
                .await
                .map_err(|e| StartupError::Runtime(format!("migrations failed: {e}")))?;
            info!("database migrations applied");
        }
        Arc::new(SeaOrmUserRepository::new(db))
    } else {
        warn!("database.url not set; users are kept in memory and lost on restart");
        Arc::new(InMemoryUserRepository::default())
    };

    let auth = AuthService::from_settings(repo, &cfg.auth)
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    Ok(ServerState { auth: Arc::new(auth) })
}

pub fn build_app(cfg: &AppConfig, state: ServerState) -> Router {
    routes::build_router(state, build_cors(), &cfg.server.base_path)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app = build_app(&cfg, state);

    let addr = bind_addr(&cfg)?;
    info!(%addr, base_path = %cfg.server.base_path, "starting auth gateway");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
