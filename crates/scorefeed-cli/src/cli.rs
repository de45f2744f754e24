//! CLI argument definitions for scorefeed.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fetch` | Fetch, decode and validate the score dataset |
//! | `validate` | Validate a local JSON file against the schema |
//! | `schema` | Print the effective schema descriptor |
//!
//! # Examples
//!
//! ```bash
//! # Fetch with a config file, token taken from $SCOREFEED_TOKEN
//! scorefeed fetch --config scorefeed.json --document scores.sheet --pretty
//!
//! # Override the url for a one-off run
//! scorefeed fetch --url https://scores.example.test/v1/latest --document scores.sheet
//!
//! # Check a saved payload offline
//! scorefeed validate payload.json
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Fetch the score dataset and hand over only structurally valid data.
#[derive(Debug, Parser)]
#[command(name = "scorefeed", author, version, about = "Resilient score feed fetcher")]
pub struct Cli {
    /// JSON configuration file (endpoint, retry, schema).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, decode and validate the dataset.
    Fetch(FetchArgs),
    /// Decode and validate a local JSON file without network access.
    Validate(ValidateArgs),
    /// Print the schema descriptor in effect.
    Schema,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Endpoint url, overriding the config file.
    #[arg(long)]
    pub url: Option<String>,

    /// Per-attempt timeout in milliseconds, overriding the config file.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Environment variable holding the bearer token.
    #[arg(long, default_value = "SCOREFEED_TOKEN")]
    pub token_env: String,

    /// Host document the sync is bound to. Must exist.
    #[arg(long)]
    pub document: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// JSON file to check.
    pub file: PathBuf,
}
