use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Longest token lifetime accepted from configuration or the CLI (one year)
pub const MAX_TOKEN_TTL_MINUTES: i64 = 525_600;

/// Identity payload carried inside a signed token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaim {
    pub id: String,
}

/// Registered JWT claims wrapped around a [`UserClaim`]
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(claim: &UserClaim, ttl: Duration) -> Result<Self, JwtError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::TokenGeneration(format!("token lifetime out of range: {}", ttl)))?;

        Ok(Self {
            id: claim.id.clone(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        })
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    InvalidSecret,
    InvalidToken(String),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::InvalidSecret => write!(f, "Invalid JWT secret"),
            JwtError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

/// Signs and verifies HS256 tokens with a symmetric secret
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, default_ttl: Duration) -> Result<Self, JwtError> {
        if secret.trim().is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl,
        })
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn sign(&self, claim: &UserClaim) -> Result<String, JwtError> {
        self.sign_with_ttl(claim, self.default_ttl)
    }

    pub fn sign_with_ttl(&self, claim: &UserClaim, ttl: Duration) -> Result<String, JwtError> {
        let claims = Claims::new(claim, ttl)?;
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Check signature, structure and expiry, returning the embedded identity
    pub fn verify(&self, token: &str) -> Result<UserClaim, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

        Ok(UserClaim { id: token_data.claims.id })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}
