use crate::checks::{CheckOutcome, CheckPlugin, ServiceState};
use crate::segment::{self, CheckError, STATUS_SEGMENT};

/// OCS meta status: OK iff the API reported statuscode 200.
///
/// The agent appends a raw response dump as a second line; only the first
/// line carries the status fields.
pub struct StatusCheck;

impl CheckPlugin for StatusCheck {
    fn segment(&self) -> &'static str {
        STATUS_SEGMENT
    }

    fn service_name(&self) -> &'static str {
        "Nextcloud Status"
    }

    fn check(&self, lines: &[String]) -> Result<CheckOutcome, CheckError> {
        let lines = segment::require_lines(STATUS_SEGMENT, lines, 1)?;
        let fields = segment::fields(&lines[0], 2)?;
        let code = segment::parse_u64(fields[0])?;
        let message = fields[1];

        let state = if code == 200 {
            ServiceState::Ok
        } else {
            ServiceState::Crit
        };

        Ok(CheckOutcome::new(
            state,
            format!("Response={} Message={}", code, message),
        ))
    }
}
