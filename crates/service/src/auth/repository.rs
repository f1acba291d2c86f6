use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::domain::{NewUser, User};
use super::errors::AuthError;

/// Repository abstraction for user persistence.
///
/// `insert` must fail with `AuthError::Conflict` when the email is taken, even
/// if a concurrent caller won the race after an `exists` check.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn exists(&self, email: &str) -> Result<bool, AuthError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;
    async fn insert(&self, user: NewUser) -> Result<User, AuthError>;
    async fn touch_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), AuthError>;
}

/// Process-local repository, used when no database is configured and in tests.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct InMemoryUserRepository {
        users: RwLock<HashMap<String, User>>, // key: email as given
    }

    impl InMemoryUserRepository {
        pub async fn len(&self) -> usize {
            self.users.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.users.read().await.is_empty()
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn exists(&self, email: &str) -> Result<bool, AuthError> {
            Ok(self.users.read().await.contains_key(email))
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
            Ok(self.users.read().await.get(email).cloned())
        }

        async fn insert(&self, new: NewUser) -> Result<User, AuthError> {
            let mut users = self.users.write().await;
            if users.contains_key(&new.email) {
                return Err(AuthError::Conflict);
            }
            let user = User {
                id: Uuid::new_v4(),
                email: new.email,
                password_hash: new.password_hash,
                role: new.role,
                created_at: Utc::now(),
                last_login_at: None,
            };
            users.insert(user.email.clone(), user.clone());
            Ok(user)
        }

        async fn touch_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), AuthError> {
            let mut users = self.users.write().await;
            let user = users
                .values_mut()
                .find(|u| u.id == user_id)
                .ok_or_else(|| AuthError::Repository(format!("user {user_id} not found")))?;
            user.last_login_at = Some(at);
            Ok(())
        }
    }

}
