use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use super::parsers::{parse_duration_arg, parse_header, parse_target_url};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Declarative HTTP request runner: single requests, batches and dependency chains."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Send a single request
    Req(ReqArgs),
    /// Run the independent requests of a config file
    Bat(ConfigArgs),
    /// Run a config file as a dependency chain with variable extraction
    Chain(ConfigArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ReqArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS)
    pub method: String,

    /// Absolute target URL
    #[arg(value_parser = parse_target_url)]
    pub url: String,

    /// Request header in 'Key: Value' form
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub header: Option<(String, String)>,

    /// JSON request body, sent for POST, PUT and PATCH
    #[arg(long = "json", short = 'j')]
    pub json: Option<String>,

    /// Request timeout (supports ms/s/m/h)
    #[arg(long = "timeout", short = 't', default_value = "30s", value_parser = parse_duration_arg)]
    pub timeout: Duration,
}

impl ReqArgs {
    /// The header in the single-line form the request factory expects.
    #[must_use]
    pub fn header_line(&self) -> String {
        self.header
            .as_ref()
            .map(|(key, value)| format!("{}: {}", key, value))
            .unwrap_or_default()
    }
}

#[derive(Debug, Args, Clone)]
pub struct ConfigArgs {
    /// Path to a .toml or .json run configuration
    pub config: PathBuf,
}
