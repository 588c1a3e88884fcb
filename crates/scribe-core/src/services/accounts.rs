//! Account use cases - signup, login and token resolution.

use std::sync::Arc;

use crate::domain::{User, mask_email};
use crate::error::DomainError;
use crate::ports::{AuthError, PasswordService, TokenClaims, TokenService, UserRepository};

/// A freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub fn tokens(&self) -> &Arc<dyn TokenService> {
        &self.tokens
    }

    /// Register a new account. The email must not be taken.
    pub async fn signup(&self, email: &str, password: &str) -> Result<User, DomainError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = self.passwords.hash(password).map_err(internal)?;

        // A concurrent signup can still win the race; the unique index turns
        // that into a Constraint error, which maps to Duplicate.
        let user = self.users.insert(User::new(email.to_string(), password_hash)).await?;
        tracing::info!(user_id = %user.id, email = %mask_email(&user.email), "User registered");

        Ok(user)
    }

    /// Exchange credentials for a bearer token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, DomainError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::debug!(email = %mask_email(email), "Login for unknown email");
            return Err(DomainError::Unauthorized);
        };

        if !self.passwords.verify(password, &user.password_hash) {
            tracing::debug!(user_id = %user.id, "Login with wrong password");
            return Err(DomainError::Unauthorized);
        }

        let access_token = self
            .tokens
            .generate_token(user.id, &user.email)
            .map_err(internal)?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }

    /// Load the account a decoded token refers to.
    pub async fn current_user(&self, claims: &TokenClaims) -> Result<User, DomainError> {
        self.users
            .find_by_id(claims.user_id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(claims.user_id))
    }
}

fn internal(err: AuthError) -> DomainError {
    DomainError::Internal(err.to_string())
}
