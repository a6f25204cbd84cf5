use crate::checks::{CheckOutcome, CheckPlugin, ServiceState};
use crate::segment::{self, APPS_SEGMENT, CheckError};

/// Installed app count and pending updates from `nextcloud_apps`.
///
/// Any pending update is a failure condition on its own, with no threshold
/// involved. The second segment line is the agent's raw update listing and
/// is surfaced verbatim in the CRIT summary.
pub struct AppsCheck;

impl CheckPlugin for AppsCheck {
    fn segment(&self) -> &'static str {
        APPS_SEGMENT
    }

    fn service_name(&self) -> &'static str {
        "Nextcloud Apps"
    }

    fn check(&self, lines: &[String]) -> Result<CheckOutcome, CheckError> {
        let lines = segment::require_lines(APPS_SEGMENT, lines, 2)?;
        let fields = segment::fields(&lines[0], 2)?;
        let installed = segment::parse_u64(fields[0])?;
        let updates = segment::parse_u64(fields[1])?;

        let outcome = if updates > 0 {
            CheckOutcome::new(
                ServiceState::Crit,
                format!("Update Available = {}", lines[1]),
            )
        } else {
            CheckOutcome::new(
                ServiceState::Ok,
                format!("Installed Apps = {}", installed),
            )
        };
        Ok(outcome)
    }
}
