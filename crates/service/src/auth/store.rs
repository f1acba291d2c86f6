use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, PasswordHash, Version,
};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use rand::rngs::OsRng;
use uuid::Uuid;

pub use configs::HashingConfig;

use super::domain::{NewUser, User};
use super::errors::AuthError;
use super::repository::UserRepository;

/// Input for the timing-equalizing verification of unknown accounts.
const DUMMY_PASSWORD: &str = "not-a-real-password";

/// User Store: Argon2id hashing and verification on top of a `UserRepository`.
pub struct UserStore {
    repo: Arc<dyn UserRepository>,
    hasher: Argon2<'static>,
    dummy_hash: OnceCell<String>,
}

impl UserStore {
    pub fn new(repo: Arc<dyn UserRepository>, hashing: HashingConfig) -> Result<Self, AuthError> {
        let params = Params::new(hashing.memory_kib, hashing.iterations, hashing.parallelism, None)
            .map_err(|e| AuthError::HashError(e.to_string()))?;
        Ok(Self {
            repo,
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            dummy_hash: OnceCell::new(),
        })
    }

    pub async fn exists(&self, email: &str) -> Result<bool, AuthError> {
        self.repo.exists(email).await
    }

    /// Hash the password and persist the user. Fails with `Conflict` on a taken email.
    pub async fn create(&self, email: &str, password: &str, role: &str) -> Result<User, AuthError> {
        let password_hash = self.hash(password)?;
        self.repo
            .insert(NewUser { email: email.to_string(), password_hash, role: role.to_string() })
            .await
    }

    pub async fn find(&self, email: &str) -> Result<Option<User>, AuthError> {
        self.repo.find_by_email(email).await
    }

    /// Check `password` against the stored hash. A mismatch is `Ok(false)`;
    /// only an unparsable stored hash is an error.
    pub fn verify(&self, user: &User, password: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(&user.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        Ok(self.hasher.verify_password(password.as_bytes(), &parsed).is_ok())
    }

    /// Spend the same effort as `verify` for an account that does not exist.
    pub fn burn_verification(&self, password: &str) {
        let Ok(hash) = self.dummy_hash.get_or_try_init(|| self.hash(DUMMY_PASSWORD)) else {
            return;
        };
        if let Ok(parsed) = PasswordHash::new(hash) {
            let _ = self.hasher.verify_password(password.as_bytes(), &parsed);
        }
    }

    pub async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), AuthError> {
        self.repo.touch_last_login(user_id, at).await
    }

    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();
        Ok(hash)
    }
}
