mod fetch;
mod schema;
mod validate;

use std::path::Path;

use scorefeed_core::PipelineConfig;
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Fetch(args) => fetch::run(args, config).await,
        Command::Validate(args) => validate::run(args, &config),
        Command::Schema => schema::run(&config),
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, CliError> {
    match path {
        Some(path) => Ok(PipelineConfig::from_path(path)?),
        None => Ok(PipelineConfig::default()),
    }
}
