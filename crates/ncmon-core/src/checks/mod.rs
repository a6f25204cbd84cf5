//! Check evaluation: maps parsed segments to service verdicts.

pub mod apps;
pub mod server;
pub mod software;
pub mod status;

use serde::Serialize;
use tracing::warn;

use crate::levels::Metric;
use crate::segment::{CheckError, SegmentMap};

// ============================================================
// Core types
// ============================================================

/// Three-state service health verdict, ordered by badness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceState {
    Ok,
    Warn,
    Crit,
}

impl ServiceState {
    /// Conventional monitoring plugin exit code (OK=0, WARN=1, CRIT=2).
    pub fn exit_code(self) -> u8 {
        match self {
            ServiceState::Ok => 0,
            ServiceState::Warn => 1,
            ServiceState::Crit => 2,
        }
    }
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ServiceState::Ok => "OK",
            ServiceState::Warn => "WARN",
            ServiceState::Crit => "CRIT",
        };
        f.write_str(s)
    }
}

/// One evaluated check: exactly one verdict plus any number of trend metrics.
#[derive(Debug, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub state: ServiceState,
    pub summary: String,
    pub metrics: Vec<Metric>,
}

impl CheckOutcome {
    pub fn new(state: ServiceState, summary: impl Into<String>) -> Self {
        Self {
            state,
            summary: summary.into(),
            metrics: Vec::new(),
        }
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }
}

/// A discovered service instance. Stateless, one per check kind per cycle.
#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub name: &'static str,
}

// ============================================================
// Check plugin trait and registry
// ============================================================

pub trait CheckPlugin: Send + Sync {
    /// Name of the segment this check consumes.
    fn segment(&self) -> &'static str;

    /// Service name shown to the monitoring consumer.
    fn service_name(&self) -> &'static str;

    /// Declares the single service instance for this check kind. The mere
    /// presence of a parseable segment implies applicability, so no input
    /// inspection happens here.
    fn discover(&self) -> Service {
        Service {
            name: self.service_name(),
        }
    }

    fn check(&self, lines: &[String]) -> Result<CheckOutcome, CheckError>;
}

pub fn all_checks() -> Vec<Box<dyn CheckPlugin>> {
    vec![
        Box::new(status::StatusCheck),
        Box::new(software::SoftwareCheck),
        Box::new(apps::AppsCheck),
        Box::new(server::ServerCheck),
    ]
}

// ============================================================
// Batch evaluation
// ============================================================

/// An evaluated service: the discovered instance plus its outcome.
#[derive(Debug, Serialize)]
pub struct ServiceReport {
    pub service: &'static str,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

/// Runs every check against `segments`.
///
/// A parse failure in one segment becomes a CRIT outcome naming the broken
/// field for that service only; the remaining checks still run.
pub fn evaluate_all(segments: &SegmentMap) -> Vec<ServiceReport> {
    all_checks()
        .into_iter()
        .map(|plugin| {
            let service = plugin.discover().name;
            let outcome = segments
                .get(plugin.segment())
                .and_then(|lines| plugin.check(lines))
                .unwrap_or_else(|err| {
                    warn!("{}: {}", service, err);
                    CheckOutcome::new(ServiceState::Crit, err.to_string())
                });
            ServiceReport { service, outcome }
        })
        .collect()
}
