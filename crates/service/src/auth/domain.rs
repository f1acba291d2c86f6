use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The only login method this gateway offers.
pub const EMAIL_STRATEGY: &str = "email";

/// Registration input. Fields are optional so that absent values reach
/// validation instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl RegisterInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: Some(email.into()), password: Some(password.into()), role: None }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Login input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: Some(email.into()), password: Some(password.into()) }
    }
}

/// Stored user record. Holds the password hash, so it is never serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Insert payload for the repository; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Capability descriptor returned by `GET /config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStrategy {
    pub strategy: String,
}

impl Default for AuthStrategy {
    fn default() -> Self {
        Self { strategy: EMAIL_STRATEGY.to_string() }
    }
}

/// Profile + token bundle returned by register and login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub name: String,
    pub access_token: String,
    pub refresh_token: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl AuthResult {
    /// The same token is handed out for both access and refresh.
    pub fn new(user: &User, token: String) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            name: user.email.clone(),
            access_token: token.clone(),
            refresh_token: token,
            is_active: true,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}
