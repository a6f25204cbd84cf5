//! ncmon-agent - Nextcloud serverinfo collector.
//!
//! Queries the serverinfo OCS API and prints the segmented, pipe-delimited
//! wire format consumed by ncmon-check. Diagnostics go to stderr via
//! tracing; stdout carries nothing but the wire format.

mod emit;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use ncmon_core::config::AgentConfig;
use ncmon_core::schema::ServerInfo;

/// Nextcloud serverinfo collector.
#[derive(Parser)]
#[command(name = "ncmon-agent", about = "Nextcloud serverinfo collector", version)]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "/etc/check_mk/ncmon.yml")]
    config: PathBuf,

    /// HTTP timeout in seconds.
    #[arg(long, default_value = "10")]
    timeout: u64,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("ncmon_agent={}", level).parse().unwrap())
        .add_directive(format!("ncmon_core={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Error type for the serverinfo fetch.
#[derive(Debug)]
enum FetchError {
    /// Request could not be built or sent.
    Http(reqwest::Error),
    /// Response body did not decode into the serverinfo schema.
    Decode(reqwest::Error),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Http(err) => write!(f, "request failed: {}", err),
            FetchError::Decode(err) => write!(f, "unexpected response body: {}", err),
        }
    }
}

impl std::error::Error for FetchError {}

/// Fetches and decodes the serverinfo response described by `config`.
///
/// HTTP error statuses are not rejected here: the API wraps failures in the
/// OCS envelope and the status check downstream turns a non-200 statuscode
/// into a CRIT verdict.
fn fetch_server_info(config: &AgentConfig, timeout: Duration) -> Result<ServerInfo, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(FetchError::Http)?;

    let response = client
        .get(config.url())
        .basic_auth(&config.username, Some(&config.password))
        .send()
        .map_err(FetchError::Http)?;

    response.json().map_err(FetchError::Decode)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    info!("ncmon-agent {} starting", env!("CARGO_PKG_VERSION"));

    let config = match AgentConfig::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            error!("Failed to load {}: {}", args.config.display(), err);
            return ExitCode::FAILURE;
        }
    };

    info!("Querying {}", config.url());

    let server_info = match fetch_server_info(&config, Duration::from_secs(args.timeout)) {
        Ok(info) => info,
        Err(err) => {
            error!("Failed to fetch serverinfo: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = emit::emit_all(&mut out, &server_info) {
        error!("Failed to write agent output: {}", err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
