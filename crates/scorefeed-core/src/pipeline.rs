//! The fetch, decode, validate orchestrator.
//!
//! ```text
//! Idle -> Fetching -> Decoding -> Validating -> Done
//!   \________\___________\____________\______> Failed
//! ```
//!
//! Every invocation owns its own state. A failure is logged once through the
//! [`LogSink`] and returned wrapped in a [`PipelineError`] whose message is
//! prefixed with the operation name. Success is never logged here.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::auth::{AuthTokenProvider, EnvTokenProvider};
use crate::collaborators::{HostContext, LogDetail, LogSink, TracingLogSink};
use crate::decoder::decode;
use crate::endpoint::Endpoint;
use crate::error::{FetchError, FetchErrorKind};
use crate::executor::RequestExecutor;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::retry::RetryPolicy;
use crate::schema::{validate, SchemaDescriptor};

/// Operation name used as the prefix of every wrapped error.
pub const FETCH_DATA: &str = "fetch_data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Idle,
    Fetching,
    Decoding,
    Validating,
    Done,
    Failed,
}

impl PipelineStage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Decoding => "decoding",
            Self::Validating => "validating",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform error returned by [`ScorePipeline::fetch_data`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{operation}: {source}")]
pub struct PipelineError {
    operation: &'static str,
    step: PipelineStage,
    #[source]
    source: FetchError,
}

impl PipelineError {
    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    /// Stage that was running when the failure happened.
    pub const fn step(&self) -> PipelineStage {
        self.step
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.source.kind()
    }

    pub const fn inner(&self) -> &FetchError {
        &self.source
    }

    pub fn into_inner(self) -> FetchError {
        self.source
    }
}

/// Per-call state tracker.
#[derive(Debug)]
struct Invocation {
    stage: PipelineStage,
}

impl Invocation {
    const fn new() -> Self {
        Self {
            stage: PipelineStage::Idle,
        }
    }

    fn advance(&mut self, next: PipelineStage) {
        debug!(from = %self.stage, to = %next, "pipeline stage");
        self.stage = next;
    }

    /// Mark the call failed and return the stage that failed.
    fn fail(&mut self) -> PipelineStage {
        let failed_at = self.stage;
        self.advance(PipelineStage::Failed);
        failed_at
    }
}

/// Fetches the score dataset and returns it only once it is structurally valid.
#[derive(Clone)]
pub struct ScorePipeline {
    executor: RequestExecutor,
    endpoint: Endpoint,
    retry_policy: RetryPolicy,
    schema: SchemaDescriptor,
    auth: Arc<dyn AuthTokenProvider>,
    context: Arc<dyn HostContext>,
    log_sink: Arc<dyn LogSink>,
}

impl ScorePipeline {
    pub fn builder(endpoint: Endpoint, context: Arc<dyn HostContext>) -> ScorePipelineBuilder {
        ScorePipelineBuilder::new(endpoint, context)
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }

    pub async fn fetch_data(&self) -> Result<Value, PipelineError> {
        let mut invocation = Invocation::new();

        match self.run(&mut invocation).await {
            Ok(payload) => Ok(payload),
            Err(source) => {
                let step = invocation.fail();
                let error = PipelineError {
                    operation: FETCH_DATA,
                    step,
                    source,
                };
                self.log_sink
                    .log_error(&LogDetail::from_error(step.as_str(), &error));
                Err(error)
            }
        }
    }

    async fn run(&self, invocation: &mut Invocation) -> Result<Value, FetchError> {
        if !self.context.has_active_document() {
            return Err(FetchError::Context);
        }

        invocation.advance(PipelineStage::Fetching);
        let response = self
            .executor
            .execute(&self.endpoint, &self.retry_policy, self.auth.as_ref())
            .await?;

        invocation.advance(PipelineStage::Decoding);
        let payload = decode(&response)?;

        invocation.advance(PipelineStage::Validating);
        validate(&payload, &self.schema)?;

        invocation.advance(PipelineStage::Done);
        Ok(payload)
    }
}

/// Builder for [`ScorePipeline`]. Everything but the endpoint and context has a default.
pub struct ScorePipelineBuilder {
    endpoint: Endpoint,
    context: Arc<dyn HostContext>,
    retry_policy: RetryPolicy,
    schema: SchemaDescriptor,
    http_client: Option<Arc<dyn HttpClient>>,
    auth: Option<Arc<dyn AuthTokenProvider>>,
    log_sink: Option<Arc<dyn LogSink>>,
}

impl ScorePipelineBuilder {
    pub fn new(endpoint: Endpoint, context: Arc<dyn HostContext>) -> Self {
        Self {
            endpoint,
            context,
            retry_policy: RetryPolicy::default(),
            schema: SchemaDescriptor::scores(),
            http_client: None,
            auth: None,
            log_sink: None,
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_schema(mut self, schema: SchemaDescriptor) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn with_auth(mut self, auth: Arc<dyn AuthTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_log_sink(mut self, log_sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = Some(log_sink);
        self
    }

    pub fn build(self) -> ScorePipeline {
        let http_client = self
            .http_client
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));

        ScorePipeline {
            executor: RequestExecutor::new(http_client),
            endpoint: self.endpoint,
            retry_policy: self.retry_policy,
            schema: self.schema,
            auth: self
                .auth
                .unwrap_or_else(|| Arc::new(EnvTokenProvider::default())),
            context: self.context,
            log_sink: self.log_sink.unwrap_or_else(|| Arc::new(TracingLogSink)),
        }
    }
}
