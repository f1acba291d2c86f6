#![cfg(test)]
use std::sync::Arc;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use models::db::{connect_with_config, DatabaseConfig};

use crate::auth::repository::memory::InMemoryUserRepository;
use crate::auth::service::{AuthConfig, AuthService};
use crate::auth::store::{HashingConfig, UserStore};
use crate::auth::token::TokenIssuer;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Argon2 params cheap enough for unit tests.
pub fn fast_hashing() -> HashingConfig {
    HashingConfig { memory_kib: 64, iterations: 1, parallelism: 1 }
}

pub fn memory_service() -> AuthService {
    let store = UserStore::new(Arc::new(InMemoryUserRepository::default()), fast_hashing())
        .expect("valid hashing params");
    AuthService::new(store, TokenIssuer::new("test-secret", None), AuthConfig::default())
}

/// Connect to `DATABASE_URL` and migrate once; `None` when no database is configured.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("skip: DATABASE_URL not set");
        return Ok(None);
    };
    let cfg = DatabaseConfig { url, min_connections: 1, ..DatabaseConfig::default() };

    MIGRATED
        .get_or_init(|| async {
            let db = connect_with_config(&cfg).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
        })
        .await;

    Ok(Some(connect_with_config(&cfg).await?))
}
