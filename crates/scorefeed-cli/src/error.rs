use scorefeed_core::{ConfigError, FetchError, FetchErrorKind, PipelineError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("{0}")]
    Invalid(FetchError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Pipeline(error) => kind_exit_code(error.kind()),
            Self::Invalid(error) => kind_exit_code(error.kind()),
            Self::Serialization(_) => 5,
            Self::Io(_) => 10,
        }
    }
}

const fn kind_exit_code(kind: FetchErrorKind) -> u8 {
    match kind {
        FetchErrorKind::Config => 2,
        FetchErrorKind::Context => 3,
        FetchErrorKind::Transient | FetchErrorKind::Http => 4,
        FetchErrorKind::Parse | FetchErrorKind::Schema => 5,
    }
}
