//! Credential ports - password hashing and bearer tokens.

use uuid::Uuid;

/// Claims carried by a decoded bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    /// Absolute expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Token service trait for signed, time-limited bearer tokens.
pub trait TokenService: Send + Sync {
    /// Sign a token for `user_id` that expires `ttl_minutes` from now.
    fn issue_token(&self, user_id: Uuid, email: &str, ttl_minutes: i64)
    -> Result<String, AuthError>;

    /// Verify signature and expiry and return the claims.
    ///
    /// Malformed, tampered and expired tokens all come back as `Err`; this
    /// never panics on untrusted input.
    fn decode_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Configured lifetime of tokens issued by `generate_token`.
    fn expiration_minutes(&self) -> i64;

    /// Issue a token with the configured lifetime.
    fn generate_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        self.issue_token(user_id, email, self.expiration_minutes())
    }

    fn expiration_seconds(&self) -> i64 {
        self.expiration_minutes() * 60
    }
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a stored hash. A hash that cannot be parsed
    /// does not match anything.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
