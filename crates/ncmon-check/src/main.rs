//! ncmon-check - evaluates agent output into service verdicts.
//!
//! Reads the wire format produced by ncmon-agent from a file (or stdin with
//! "-"), runs every check, and prints one line per service. The process
//! exit code is the worst service state (OK=0, WARN=1, CRIT=2), so the
//! binary can stand in for a conventional monitoring plugin.

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, debug, error};
use tracing_subscriber::EnvFilter;

use ncmon_core::checks::{ServiceReport, ServiceState, evaluate_all};
use ncmon_core::segment::SegmentMap;

/// Exit code for "could not evaluate at all" (UNKNOWN in plugin terms).
const EXIT_UNKNOWN: u8 = 3;

/// Nextcloud check evaluator.
#[derive(Parser)]
#[command(name = "ncmon-check", about = "Evaluates ncmon agent output", version)]
struct Args {
    /// Agent output to evaluate ("-" for stdin).
    #[arg(default_value = "-")]
    input: String,

    /// Print machine-readable JSON instead of plugin lines.
    #[arg(long)]
    json: bool,

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
        .add_directive(format!("ncmon_check={}", level).parse().unwrap())
        .add_directive(format!("ncmon_core={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
    }
}

/// Renders one service line in plugin format:
/// `service: STATE - summary | name=value;warn;crit;lower;upper ...`
fn render(report: &ServiceReport) -> String {
    let mut line = format!(
        "{}: {} - {}",
        report.service, report.outcome.state, report.outcome.summary
    );
    if !report.outcome.metrics.is_empty() {
        let perfdata: Vec<String> = report
            .outcome
            .metrics
            .iter()
            .map(|metric| metric.to_string())
            .collect();
        line.push_str(" | ");
        line.push_str(&perfdata.join(" "));
    }
    line
}

/// Worst state across all reports.
fn worst_state(reports: &[ServiceReport]) -> ServiceState {
    reports
        .iter()
        .map(|report| report.outcome.state)
        .max()
        .unwrap_or(ServiceState::Ok)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let raw = match read_input(&args.input) {
        Ok(raw) => raw,
        Err(err) => {
            error!("Failed to read {}: {}", args.input, err);
            return ExitCode::from(EXIT_UNKNOWN);
        }
    };

    let segments = SegmentMap::parse(&raw);
    debug!("Parsed {} segments", segments.len());

    let reports = evaluate_all(&segments);

    if args.json {
        match serde_json::to_string_pretty(&reports) {
            Ok(rendered) => println!("{}", rendered),
            Err(err) => {
                error!("Failed to serialize reports: {}", err);
                return ExitCode::from(EXIT_UNKNOWN);
            }
        }
    } else {
        for report in &reports {
            println!("{}", render(report));
        }
    }

    ExitCode::from(worst_state(&reports).exit_code())
}
