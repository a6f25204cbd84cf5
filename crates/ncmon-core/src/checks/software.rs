use crate::checks::{CheckOutcome, CheckPlugin, ServiceState};
use crate::levels::{Metric, crit_level, to_mb, warn_level};
use crate::segment::{self, CheckError, SOFTWARE_SEGMENT};

/// Version plus memory and swap pressure from `nextcloud_software`.
///
/// The segment carries five lines: version, freespace, cpu load list, and
/// total|free|used triples (raw bytes) for memory and swap. Earlier
/// revisions compared `used > warn` before `used > crit`, which left the
/// CRIT branch unreachable; crit is now compared first so both escalations
/// can fire.
pub struct SoftwareCheck;

/// Parses a total|free|used byte triple and scales it to megabytes.
fn parse_triple(line: &str) -> Result<[f64; 3], CheckError> {
    let fields = segment::fields(line, 3)?;
    Ok([
        to_mb(segment::parse_u64(fields[0])?),
        to_mb(segment::parse_u64(fields[1])?),
        to_mb(segment::parse_u64(fields[2])?),
    ])
}

/// Escalation for one triple, crit before warn. None means within levels.
fn escalate(used: f64, total: f64) -> Option<(ServiceState, u32)> {
    if used > crit_level(total) as f64 {
        Some((ServiceState::Crit, 90))
    } else if used > warn_level(total) as f64 {
        Some((ServiceState::Warn, 75))
    } else {
        None
    }
}

impl CheckPlugin for SoftwareCheck {
    fn segment(&self) -> &'static str {
        SOFTWARE_SEGMENT
    }

    fn service_name(&self) -> &'static str {
        "Nextcloud Software"
    }

    fn check(&self, lines: &[String]) -> Result<CheckOutcome, CheckError> {
        let lines = segment::require_lines(SOFTWARE_SEGMENT, lines, 5)?;
        let version = &lines[0];
        let _freespace = &lines[1];
        let _cpuload = segment::fields(&lines[2], 1)?
            .iter()
            .map(|f| segment::parse_f64(f))
            .collect::<Result<Vec<f64>, _>>()?;
        let mem = parse_triple(&lines[3])?;
        let swap = parse_triple(&lines[4])?;

        let mut state = ServiceState::Ok;
        let mut parts: Vec<String> = Vec::new();
        for (label, triple) in [("Memory", mem), ("SWAP", swap)] {
            if let Some((level_state, pct)) = escalate(triple[2], triple[0]) {
                parts.push(format!(
                    "Used {} > {}%. Max|Free|Used={:?}",
                    label, pct, triple
                ));
                state = state.max(level_state);
            }
        }

        let summary = if parts.is_empty() {
            format!("Version={}", version)
        } else {
            parts.join(", ")
        };

        Ok(CheckOutcome {
            state,
            summary,
            metrics: vec![
                Metric::scaled("mem", mem[2], mem[0]),
                Metric::scaled("swap", swap[2], swap[0]),
            ],
        })
    }
}
