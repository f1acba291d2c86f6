use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;

/// JWT claims minted for a user. `exp` is present only when a TTL is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Token Issuer: HS256 signing with a shared secret.
pub struct TokenIssuer {
    header: Header,
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: Option<u64>,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_secs: Option<u64>) -> Self {
        Self {
            header: Header::new(Algorithm::HS256),
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: ttl_secs.filter(|s| *s > 0),
        }
    }

    pub fn issue(&self, subject: Uuid, email: &str) -> Result<String, AuthError> {
        let exp = self
            .ttl_secs
            .map(|ttl| Utc::now().timestamp().saturating_add(i64::try_from(ttl).unwrap_or(i64::MAX)));
        let claims = Claims { sub: subject.to_string(), email: email.to_string(), exp };
        encode(&self.header, &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// An issuer whose header names an RSA algorithm for an HMAC key, so every `issue` fails.
    #[cfg(test)]
    pub(crate) fn broken(secret: &str) -> Self {
        Self { header: Header::new(Algorithm::RS256), ..Self::new(secret, None) }
    }

    /// Verify the signature and return the claims. Expiry is checked only when the token carries one.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok(data.claims)
    }
}
