//! Capabilities the pipeline consumes but does not own: the host context
//! check and the structured log sink.

use std::error::Error as StdError;
use std::path::PathBuf;

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Answers "is there an active bound host document?".
pub trait HostContext: Send + Sync {
    fn has_active_document(&self) -> bool;
}

/// Fixed answer, for embedding callers that already know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticContext(pub bool);

impl HostContext for StaticContext {
    fn has_active_document(&self) -> bool {
        self.0
    }
}

/// Host document backed by a file on disk. Active while the file exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContext {
    path: Option<PathBuf>,
}

impl DocumentContext {
    pub fn bound(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub const fn unbound() -> Self {
        Self { path: None }
    }
}

impl HostContext for DocumentContext {
    fn has_active_document(&self) -> bool {
        self.path.as_deref().is_some_and(|path| path.is_file())
    }
}

/// Structured record handed to the log sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogDetail {
    pub step: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub logged_at: String,
}

impl LogDetail {
    pub fn new(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            message: message.into(),
            stack: None,
            logged_at: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_else(|_| String::from("<unformattable>")),
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Build a detail from an error, recording its `source()` chain as the stack.
    pub fn from_error(step: impl Into<String>, error: &(dyn StdError + 'static)) -> Self {
        let detail = Self::new(step, error.to_string());
        let chain = source_chain(error);
        if chain.is_empty() {
            detail
        } else {
            detail.with_stack(chain.join("\n"))
        }
    }
}

fn source_chain(error: &(dyn StdError + 'static)) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        chain.push(format!("caused by: {cause}"));
        current = cause.source();
    }
    chain
}

/// Destination for failure and success records.
pub trait LogSink: Send + Sync {
    fn log_error(&self, detail: &LogDetail);
    fn log_success(&self, detail: &LogDetail);
}

/// Emits log records as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log_error(&self, detail: &LogDetail) {
        tracing::error!(
            step = %detail.step,
            stack = detail.stack.as_deref().unwrap_or(""),
            logged_at = %detail.logged_at,
            "{}",
            detail.message
        );
    }

    fn log_success(&self, detail: &LogDetail) {
        tracing::info!(
            step = %detail.step,
            logged_at = %detail.logged_at,
            "{}",
            detail.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, TransientFailure};
    use crate::http_client::TransportError;

    #[test]
    fn document_context_requires_an_existing_file() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        assert!(DocumentContext::bound(file.path()).has_active_document());
        assert!(!DocumentContext::bound("/definitely/not/here.sheet").has_active_document());
        assert!(!DocumentContext::unbound().has_active_document());
    }

    #[test]
    fn detail_records_source_chain_as_stack() {
        let error = FetchError::RetriesExhausted {
            attempts: 3,
            last: TransientFailure::Transport(TransportError::connect("reset by peer")),
        };

        let detail = LogDetail::from_error("fetch", &error);

        assert_eq!(detail.step, "fetch");
        assert_eq!(
            detail.stack.as_deref(),
            Some(
                "caused by: transport connect failure: reset by peer\n\
                 caused by: connect failure: reset by peer"
            )
        );
    }

    #[test]
    fn detail_without_causes_has_no_stack() {
        let detail = LogDetail::from_error("decode", &FetchError::http(404, "missing"));
        assert_eq!(detail.stack, None);

        let json = serde_json::to_value(&detail).expect("serializable");
        assert!(json.get("stack").is_none());
        assert_eq!(json["message"], "upstream returned status 404: missing");
    }
}
