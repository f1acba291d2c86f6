use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::errors::ModelError;

use crate::auth::domain::{NewUser, User};
use crate::auth::errors::AuthError;
use crate::auth::repository::UserRepository;

/// PostgreSQL-backed repository. Email uniqueness comes from the `users.email` unique index.
pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<models::user::Model> for User {
    fn from(m: models::user::Model) -> Self {
        User {
            id: m.id,
            email: m.email,
            password_hash: m.password_hash,
            role: m.role,
            created_at: m.created_at.with_timezone(&Utc),
            last_login_at: m.last_login_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

fn repo_err(e: ModelError) -> AuthError {
    match e {
        ModelError::Duplicate(_) => AuthError::Conflict,
        other => AuthError::Repository(other.to_string()),
    }
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn exists(&self, email: &str) -> Result<bool, AuthError> {
        models::user::exists_by_email(&self.db, email).await.map_err(repo_err)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let found = models::user::find_by_email(&self.db, email).await.map_err(repo_err)?;
        Ok(found.map(User::from))
    }

    async fn insert(&self, user: NewUser) -> Result<User, AuthError> {
        let created = models::user::create(&self.db, &user.email, &user.password_hash, &user.role)
            .await
            .map_err(repo_err)?;
        Ok(created.into())
    }

    async fn touch_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), AuthError> {
        models::user::touch_last_login(&self.db, user_id, at).await.map_err(repo_err)
    }
}
