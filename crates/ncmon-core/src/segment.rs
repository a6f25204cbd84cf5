//! Parsers for the agent's segmented wire format.
//!
//! The agent prints named segments, each introduced by a `<<<name>>>` marker
//! line and followed by plain-text payload lines. Fields within a line are
//! positional and separated by a pipe character. These are pure functions
//! over string input, so they are easily testable with fixtures.

use std::collections::HashMap;

/// Segment emitted for the OCS meta status.
pub const STATUS_SEGMENT: &str = "nextcloud";
/// Segment emitted for version, memory and swap numbers.
pub const SOFTWARE_SEGMENT: &str = "nextcloud_software";
/// Segment emitted for installed apps and pending updates.
pub const APPS_SEGMENT: &str = "nextcloud_apps";
/// Segment emitted for PHP opcache memory usage.
pub const SERVER_SEGMENT: &str = "nextcloud_server";

/// Error type for evaluation failures.
///
/// A failed line aborts the check that depends on it; there are no partial
/// results and no defaulting of missing fields.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckError {
    /// The segment never appeared in the agent output.
    MissingSegment(&'static str),
    /// The segment has fewer payload lines than the check consumes.
    TruncatedSegment {
        segment: &'static str,
        expected: usize,
        got: usize,
    },
    /// A line split into fewer pipe fields than its declared arity.
    MissingField {
        line: String,
        expected: usize,
        got: usize,
    },
    /// A field failed conversion to its declared numeric type.
    InvalidNumber { field: String },
}

impl std::fmt::Display for CheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckError::MissingSegment(name) => {
                write!(f, "segment <<<{}>>> missing from agent output", name)
            }
            CheckError::TruncatedSegment {
                segment,
                expected,
                got,
            } => write!(
                f,
                "segment <<<{}>>> truncated: expected {} lines, got {}",
                segment, expected, got
            ),
            CheckError::MissingField {
                line,
                expected,
                got,
            } => write!(
                f,
                "expected {} fields, got {} in line '{}'",
                expected, got, line
            ),
            CheckError::InvalidNumber { field } => write!(f, "not a number: '{}'", field),
        }
    }
}

impl std::error::Error for CheckError {}

/// Agent output split into named segments.
///
/// Lines before the first marker are ignored; a repeated marker appends to
/// the segment already collected under that name.
#[derive(Debug, Default)]
pub struct SegmentMap {
    segments: HashMap<String, Vec<String>>,
}

impl SegmentMap {
    /// Splits raw agent output at `<<<name>>>` marker lines.
    pub fn parse(input: &str) -> Self {
        let mut segments: HashMap<String, Vec<String>> = HashMap::new();
        let mut current: Option<String> = None;

        for line in input.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if let Some(name) = line
                .strip_prefix("<<<")
                .and_then(|rest| rest.strip_suffix(">>>"))
            {
                segments.entry(name.to_string()).or_default();
                current = Some(name.to_string());
            } else if let Some(name) = &current
                && let Some(lines) = segments.get_mut(name)
            {
                lines.push(line.to_string());
            }
        }

        Self { segments }
    }

    /// Returns the payload lines of `name`.
    pub fn get(&self, name: &'static str) -> Result<&[String], CheckError> {
        self.segments
            .get(name)
            .map(|lines| lines.as_slice())
            .ok_or(CheckError::MissingSegment(name))
    }

    /// Number of segments seen in the input.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Requires `lines` to contain at least `min` entries.
pub fn require_lines<'a>(
    segment: &'static str,
    lines: &'a [String],
    min: usize,
) -> Result<&'a [String], CheckError> {
    if lines.len() < min {
        return Err(CheckError::TruncatedSegment {
            segment,
            expected: min,
            got: lines.len(),
        });
    }
    Ok(lines)
}

/// Splits a line on the pipe character, requiring at least `arity` fields.
pub fn fields(line: &str, arity: usize) -> Result<Vec<&str>, CheckError> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < arity {
        return Err(CheckError::MissingField {
            line: line.to_string(),
            expected: arity,
            got: parts.len(),
        });
    }
    Ok(parts)
}

/// Converts one field to an unsigned integer.
pub fn parse_u64(field: &str) -> Result<u64, CheckError> {
    field.trim().parse().map_err(|_| CheckError::InvalidNumber {
        field: field.to_string(),
    })
}

/// Converts one field to a float.
pub fn parse_f64(field: &str) -> Result<f64, CheckError> {
    field.trim().parse().map_err(|_| CheckError::InvalidNumber {
        field: field.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_named_segments() {
        let input = "\
<<<nextcloud>>>
200|OK
<<<nextcloud_server>>>
100|50|10|5
";
        let map = SegmentMap::parse(input);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(STATUS_SEGMENT).unwrap(), ["200|OK".to_string()]);
        assert_eq!(
            map.get(SERVER_SEGMENT).unwrap(),
            ["100|50|10|5".to_string()]
        );
    }

    #[test]
    fn parse_ignores_preamble_before_first_marker() {
        let input = "garbage\nmore garbage\n<<<nextcloud>>>\n200|OK\n";
        let map = SegmentMap::parse(input);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(STATUS_SEGMENT).unwrap().len(), 1);
    }

    #[test]
    fn parse_appends_on_repeated_marker() {
        let input = "<<<nextcloud>>>\nfirst\n<<<nextcloud>>>\nsecond\n";
        let map = SegmentMap::parse(input);

        assert_eq!(
            map.get(STATUS_SEGMENT).unwrap(),
            ["first".to_string(), "second".to_string()]
        );
    }

    #[test]
    fn parse_strips_carriage_returns() {
        let input = "<<<nextcloud>>>\r\n200|OK\r\n";
        let map = SegmentMap::parse(input);

        assert_eq!(map.get(STATUS_SEGMENT).unwrap(), ["200|OK".to_string()]);
    }

    #[test]
    fn get_reports_missing_segment() {
        let map = SegmentMap::parse("");

        assert!(map.is_empty());
        assert_eq!(
            map.get(APPS_SEGMENT),
            Err(CheckError::MissingSegment(APPS_SEGMENT))
        );
    }

    #[test]
    fn require_lines_rejects_short_segments() {
        let lines = vec!["only one".to_string()];

        assert!(require_lines(SOFTWARE_SEGMENT, &lines, 1).is_ok());
        assert_eq!(
            require_lines(SOFTWARE_SEGMENT, &lines, 5),
            Err(CheckError::TruncatedSegment {
                segment: SOFTWARE_SEGMENT,
                expected: 5,
                got: 1,
            })
        );
    }

    #[test]
    fn fields_rejects_low_arity() {
        assert_eq!(fields("200|OK", 2).unwrap(), vec!["200", "OK"]);

        // A lone status code must not default the message to empty.
        assert_eq!(
            fields("200", 2),
            Err(CheckError::MissingField {
                line: "200".to_string(),
                expected: 2,
                got: 1,
            })
        );
    }

    #[test]
    fn fields_allows_extra_trailing_fields() {
        let parts = fields("1|2|3|4", 2).unwrap();
        assert_eq!(parts.len(), 4);
    }

    #[test]
    fn numeric_conversions() {
        assert_eq!(parse_u64("1024").unwrap(), 1024);
        assert_eq!(parse_u64(" 7 ").unwrap(), 7);
        assert_eq!(parse_f64("1.5").unwrap(), 1.5);

        assert_eq!(
            parse_u64("abc"),
            Err(CheckError::InvalidNumber {
                field: "abc".to_string()
            })
        );
        assert!(parse_f64("").is_err());
    }
}
