//! # Scorefeed Core
//!
//! Resilient fetch, decode and validate pipeline for the score sync.
//!
//! ## Overview
//!
//! A single call to [`ScorePipeline::fetch_data`] either returns a JSON
//! payload whose declared top-level fields all have the declared types, or
//! fails with a classified [`PipelineError`]. Nothing partial is ever
//! returned.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`auth`] | Bearer token capability, fetched once per attempt |
//! | [`collaborators`] | Host context check and structured log sink |
//! | [`config`] | JSON configuration file and its validation |
//! | [`decoder`] | Status classification and JSON decoding |
//! | [`endpoint`] | Validated endpoint url and timeout |
//! | [`error`] | Error taxonomy |
//! | [`executor`] | Authenticated GET with bounded retries |
//! | [`http_client`] | Transport abstraction and reqwest implementation |
//! | [`pipeline`] | The orchestrator |
//! | [`retry`] | Retry policy and backoff schedule |
//! | [`schema`] | Field to type contract and validator |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scorefeed_core::{DocumentContext, PipelineConfig, ScorePipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let parts = PipelineConfig::from_path("scorefeed.json")?.into_parts()?;
//!     let pipeline = ScorePipeline::builder(parts.endpoint, Arc::new(DocumentContext::bound("scores.sheet")))
//!         .with_retry_policy(parts.retry_policy)
//!         .with_schema(parts.schema)
//!         .build();
//!
//!     let payload = pipeline.fetch_data().await?;
//!     println!("{payload}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ ScorePipeline   │── context check ──▶ HostContext
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ RequestExecutor │────▶│ HTTP Client      │
//! │ (RetryPolicy)   │     │ (reqwest)        │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ decode          │────▶│ validate         │
//! └─────────────────┘     └──────────────────┘
//! ```

pub mod auth;
pub mod collaborators;
pub mod config;
pub mod decoder;
pub mod endpoint;
pub mod error;
pub mod executor;
pub mod http_client;
pub mod pipeline;
pub mod retry;
pub mod schema;

pub use auth::{AuthError, AuthTokenProvider, EnvTokenProvider, StaticToken};
pub use collaborators::{
    DocumentContext, HostContext, LogDetail, LogSink, StaticContext, TracingLogSink,
};
pub use config::{EndpointSettings, PipelineConfig, PipelineParts, RetrySettings};
pub use decoder::decode;
pub use endpoint::Endpoint;
pub use error::{ConfigError, FetchError, FetchErrorKind, TransientFailure};
pub use executor::{AttemptOutcome, RequestExecutor};
pub use http_client::{
    HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient, TransportError, TransportErrorKind,
};
pub use pipeline::{PipelineError, PipelineStage, ScorePipeline, ScorePipelineBuilder, FETCH_DATA};
pub use retry::{is_transient_status, RetryPolicy};
pub use schema::{validate, FieldType, SchemaDescriptor, SchemaError, SchemaErrorKind, ValueKind};
