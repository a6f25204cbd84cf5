use crate::checks::{CheckOutcome, CheckPlugin, ServiceState};
use crate::levels::{Metric, to_mb};
use crate::segment::{self, CheckError, SERVER_SEGMENT};

/// PHP opcache memory usage from `nextcloud_server`.
///
/// Informational only: the verdict is always OK. The emitted metric carries
/// warn/crit levels so the consumer can color the trend, with max taken as
/// used plus free (wasted bytes are outside the usable pool).
pub struct ServerCheck;

impl CheckPlugin for ServerCheck {
    fn segment(&self) -> &'static str {
        SERVER_SEGMENT
    }

    fn service_name(&self) -> &'static str {
        "Nextcloud Server"
    }

    fn check(&self, lines: &[String]) -> Result<CheckOutcome, CheckError> {
        let lines = segment::require_lines(SERVER_SEGMENT, lines, 1)?;
        let fields = segment::fields(&lines[0], 4)?;
        let used = segment::parse_u64(fields[0])?;
        let free = segment::parse_u64(fields[1])?;
        let _wasted = segment::parse_u64(fields[2])?;
        let max = to_mb(used + free);

        Ok(CheckOutcome::new(
            ServiceState::Ok,
            format!("OPCache (used|free|wasted|wasted%)={:?}", fields),
        )
        .with_metric(Metric::scaled("opcache", to_mb(used), max)))
    }
}
