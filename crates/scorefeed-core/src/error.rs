use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::auth::AuthError;
use crate::http_client::TransportError;
use crate::schema::SchemaError;

/// Malformed static configuration. Raised once, before any network access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("endpoint url is not configured")]
    MissingUrl,
    #[error("endpoint url must be an absolute http(s) url: '{value}'")]
    InvalidUrl { value: String },
    #[error("endpoint timeout must be greater than zero")]
    ZeroTimeout,
    #[error("invalid retry policy: {0}")]
    InvalidRetry(String),
    #[error("invalid schema descriptor: {0}")]
    InvalidSchema(String),
    #[error("failed to read config '{path}': {message}")]
    Read { path: String, message: String },
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Failure that the retry loop treats as temporary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransientFailure {
    #[error("token acquisition failed: {0}")]
    Auth(#[from] AuthError),
    #[error("transport {0}")]
    Transport(#[from] TransportError),
    #[error("retryable status {status}")]
    Status { status: u16, body: String },
}

/// Coarse classification of [`FetchError`], one per failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Context,
    Config,
    Transient,
    Http,
    Parse,
    Schema,
}

impl FetchErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Config => "config",
            Self::Transient => "transient",
            Self::Http => "http",
            Self::Parse => "parse",
            Self::Schema => "schema",
        }
    }
}

impl Display for FetchErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage-level error raised by the executor, decoder or validator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("no active host document is bound to this invocation")]
    Context,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("giving up after {attempts} attempt(s): {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: TransientFailure,
    },

    #[error("upstream returned status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("response body is not valid JSON: {cause}")]
    Parse { raw: String, cause: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl FetchError {
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Context => FetchErrorKind::Context,
            Self::Config(_) => FetchErrorKind::Config,
            Self::RetriesExhausted { .. } => FetchErrorKind::Transient,
            Self::Http { .. } => FetchErrorKind::Http,
            Self::Parse { .. } => FetchErrorKind::Parse,
            Self::Schema(_) => FetchErrorKind::Schema,
        }
    }

    /// Whether a later invocation could reasonably succeed unchanged.
    pub const fn retryable(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }

    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::RetriesExhausted {
                last: TransientFailure::Status { status, .. },
                ..
            } => Some(*status),
            _ => None,
        }
    }
}
