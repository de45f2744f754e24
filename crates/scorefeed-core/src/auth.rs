//! Bearer token capability.
//!
//! The executor asks the provider for a token on every attempt and never
//! caches the answer, so a provider may rotate credentials between retries.

use thiserror::Error;

/// Token could not be produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("environment variable '{name}' is not set")]
    MissingVariable { name: String },
    #[error("token is empty")]
    EmptyToken,
    #[error("{0}")]
    Provider(String),
}

/// Capability yielding the bearer token for the next request.
pub trait AuthTokenProvider: Send + Sync {
    fn token(&self) -> Result<String, AuthError>;
}

impl<F> AuthTokenProvider for F
where
    F: Fn() -> Result<String, AuthError> + Send + Sync,
{
    fn token(&self) -> Result<String, AuthError> {
        self()
    }
}

/// Fixed token, mostly useful for tests and one-off runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl AuthTokenProvider for StaticToken {
    fn token(&self) -> Result<String, AuthError> {
        if self.0.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        Ok(self.0.clone())
    }
}

/// Reads the token from an environment variable on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvTokenProvider {
    variable: String,
}

impl EnvTokenProvider {
    pub const DEFAULT_VARIABLE: &'static str = "SCOREFEED_TOKEN";

    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl Default for EnvTokenProvider {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VARIABLE)
    }
}

impl AuthTokenProvider for EnvTokenProvider {
    fn token(&self) -> Result<String, AuthError> {
        let value = std::env::var(&self.variable).map_err(|_| AuthError::MissingVariable {
            name: self.variable.clone(),
        })?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        Ok(trimmed.to_owned())
    }
}
