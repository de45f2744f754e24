use std::sync::Arc;

use scorefeed_core::{
    DocumentContext, EnvTokenProvider, LogDetail, LogSink, PipelineConfig, ScorePipeline,
    TracingLogSink,
};
use serde_json::Value;
use tracing::info;

use crate::cli::FetchArgs;
use crate::error::CliError;

pub async fn run(args: &FetchArgs, config: PipelineConfig) -> Result<Value, CliError> {
    let parts = apply_overrides(args, config).into_parts()?;

    let context = match &args.document {
        Some(path) => DocumentContext::bound(path),
        None => DocumentContext::unbound(),
    };
    let log_sink = Arc::new(TracingLogSink);

    info!(
        url = %parts.endpoint,
        max_attempts = parts.retry_policy.max_attempts(),
        fields = parts.schema.len(),
        "starting score fetch"
    );

    let pipeline = ScorePipeline::builder(parts.endpoint, Arc::new(context))
        .with_retry_policy(parts.retry_policy)
        .with_schema(parts.schema)
        .with_auth(Arc::new(EnvTokenProvider::new(args.token_env.as_str())))
        .with_log_sink(log_sink.clone())
        .build();

    let payload = pipeline.fetch_data().await?;

    log_sink.log_success(&LogDetail::new(
        "sync",
        format!("fetched and validated payload from {}", pipeline.endpoint()),
    ));

    Ok(payload)
}

fn apply_overrides(args: &FetchArgs, mut config: PipelineConfig) -> PipelineConfig {
    if let Some(url) = &args.url {
        config = config.with_url(url.as_str());
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    config
}
