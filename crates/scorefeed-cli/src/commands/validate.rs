use std::fs;

use scorefeed_core::{decode, HttpResponse, PipelineConfig};
use serde::Serialize;
use serde_json::Value;

use crate::cli::ValidateArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct ValidationReport {
    file: String,
    valid: bool,
    checked_fields: usize,
}

pub fn run(args: &ValidateArgs, config: &PipelineConfig) -> Result<Value, CliError> {
    let content = fs::read_to_string(&args.file)?;
    // A local file is treated like a 200 body so decoding rules stay identical.
    let payload = decode(&HttpResponse::ok_json(content)).map_err(CliError::Invalid)?;
    config
        .schema
        .validate(&payload)
        .map_err(|error| CliError::Invalid(error.into()))?;

    Ok(serde_json::to_value(ValidationReport {
        file: args.file.display().to_string(),
        valid: true,
        checked_fields: config.schema.len(),
    })?)
}
