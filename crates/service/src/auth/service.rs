use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};

use configs::AuthSettings;

use super::domain::{AuthResult, AuthStrategy, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::UserRepository;
use super::store::UserStore;
use super::token::TokenIssuer;

/// Auth service configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub default_role: String,
    /// Empty accepts any role string.
    pub allowed_roles: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { default_role: "patient".into(), allowed_roles: Vec::new() }
    }
}

impl From<&AuthSettings> for AuthConfig {
    fn from(s: &AuthSettings) -> Self {
        Self { default_role: s.default_role.clone(), allowed_roles: s.allowed_roles.clone() }
    }
}

/// Auth business service independent of web framework
pub struct AuthService {
    store: UserStore,
    tokens: TokenIssuer,
    cfg: AuthConfig,
}

impl AuthService {
    pub fn new(store: UserStore, tokens: TokenIssuer, cfg: AuthConfig) -> Self {
        Self { store, tokens, cfg }
    }

    /// Wire store, issuer and role policy from the `[auth]` config section.
    pub fn from_settings(repo: Arc<dyn UserRepository>, settings: &AuthSettings) -> Result<Self, AuthError> {
        let store = UserStore::new(repo, settings.hashing)?;
        let tokens = TokenIssuer::new(&settings.jwt_secret, settings.token_ttl_secs);
        Ok(Self::new(store, tokens, AuthConfig::from(settings)))
    }

    pub fn strategy(&self) -> AuthStrategy {
        AuthStrategy::default()
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Register a new user and hand back its profile with a fresh token.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::AuthService;
    /// use service::auth::domain::RegisterInput;
    /// use service::auth::repository::memory::InMemoryUserRepository;
    /// use service::auth::service::AuthConfig;
    /// use service::auth::store::{HashingConfig, UserStore};
    /// use service::auth::token::TokenIssuer;
    ///
    /// let hashing = HashingConfig { memory_kib: 64, iterations: 1, parallelism: 1 };
    /// let store = UserStore::new(Arc::new(InMemoryUserRepository::default()), hashing).unwrap();
    /// let svc = AuthService::new(store, TokenIssuer::new("secret", None), AuthConfig::default());
    /// let res = tokio_test::block_on(svc.register(RegisterInput::new("user@example.com", "pw1"))).unwrap();
    /// assert_eq!(res.email, "user@example.com");
    /// assert_eq!(res.role, "patient");
    /// assert_eq!(res.access_token, res.refresh_token);
    /// ```
    #[instrument(skip(self, input), fields(email = input.email.as_deref().unwrap_or_default()))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthResult, AuthError> {
        let email = input.email.as_deref().map(str::trim).unwrap_or_default();
        let password = input.password.as_deref().unwrap_or_default();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation("Email and password are required".into()));
        }
        if !email.contains('@') {
            return Err(AuthError::Validation("Email is invalid".into()));
        }
        let role = self.resolve_role(input.role.as_deref())?;

        if self.store.exists(email).await? {
            debug!("user exists");
            return Err(AuthError::Conflict);
        }

        let user = self.store.create(email, password, &role).await?;
        let token = self.tokens.issue(user.id, &user.email)?;
        info!(user_id = %user.id, role = %user.role, "user_registered");
        Ok(AuthResult::new(&user, token))
    }

    /// Authenticate a user by email and password.
    ///
    /// Unknown email and wrong password both yield `AuthError::Unauthorized`,
    /// and both cost one hash verification.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthError, AuthService};
    /// use service::auth::domain::{LoginInput, RegisterInput};
    /// use service::auth::repository::memory::InMemoryUserRepository;
    /// use service::auth::service::AuthConfig;
    /// use service::auth::store::{HashingConfig, UserStore};
    /// use service::auth::token::TokenIssuer;
    ///
    /// let hashing = HashingConfig { memory_kib: 64, iterations: 1, parallelism: 1 };
    /// let store = UserStore::new(Arc::new(InMemoryUserRepository::default()), hashing).unwrap();
    /// let svc = AuthService::new(store, TokenIssuer::new("secret", None), AuthConfig::default());
    /// let reg = tokio_test::block_on(svc.register(RegisterInput::new("u@e.com", "Passw0rd"))).unwrap();
    /// let res = tokio_test::block_on(svc.login(LoginInput::new("u@e.com", "Passw0rd"))).unwrap();
    /// assert_eq!(res.id, reg.id);
    /// assert!(res.last_login_at.is_some());
    /// let err = tokio_test::block_on(svc.login(LoginInput::new("u@e.com", "nope"))).unwrap_err();
    /// assert!(matches!(err, AuthError::Unauthorized));
    /// ```
    #[instrument(skip(self, input), fields(email = input.email.as_deref().unwrap_or_default()))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthResult, AuthError> {
        let (Some(email), Some(password)) = (input.email.as_deref(), input.password.as_deref()) else {
            debug!("login_rejected: missing fields");
            return Err(AuthError::Unauthorized);
        };
        let email = email.trim();

        let Some(mut user) = self.store.find(email).await? else {
            self.store.burn_verification(password);
            debug!("login_rejected");
            return Err(AuthError::Unauthorized);
        };
        if !self.store.verify(&user, password)? {
            debug!(user_id = %user.id, "login_rejected");
            return Err(AuthError::Unauthorized);
        }

        // Mint first so a token failure leaves last_login_at untouched.
        let token = self.tokens.issue(user.id, &user.email)?;
        let now = Utc::now();
        self.store.record_login(user.id, now).await?;
        user.last_login_at = Some(now);

        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthResult::new(&user, token))
    }

    fn resolve_role(&self, requested: Option<&str>) -> Result<String, AuthError> {
        let role = match requested.map(str::trim) {
            Some(r) if !r.is_empty() => r,
            _ => return Ok(self.cfg.default_role.clone()),
        };
        if !self.cfg.allowed_roles.is_empty() && !self.cfg.allowed_roles.iter().any(|a| a == role) {
            return Err(AuthError::Validation("Role is not allowed".into()));
        }
        Ok(role.to_string())
    }
}
