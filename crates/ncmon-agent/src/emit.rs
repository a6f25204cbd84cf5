//! Wire-format emission.
//!
//! One function per segment, each writing exactly the lines the matching
//! check consumes. Writers take `&mut impl Write` so tests can target
//! in-memory buffers instead of stdout.

use std::io::{self, Write};

use ncmon_core::schema::{ServerInfo, System};
use ncmon_core::segment::{APPS_SEGMENT, SERVER_SEGMENT, SOFTWARE_SEGMENT, STATUS_SEGMENT};

fn segment_header(out: &mut impl Write, name: &str) -> io::Result<()> {
    writeln!(out, "<<<{}>>>", name)
}

/// Emits all four segments in their canonical order.
pub fn emit_all(out: &mut impl Write, info: &ServerInfo) -> io::Result<()> {
    emit_status(out, info)?;
    emit_software(out, &info.ocs.data.nextcloud.system)?;
    emit_apps(out, &info.ocs.data.nextcloud.system)?;
    emit_server(out, info)
}

fn emit_status(out: &mut impl Write, info: &ServerInfo) -> io::Result<()> {
    segment_header(out, STATUS_SEGMENT)?;
    writeln!(out, "{}|{}", info.ocs.meta.statuscode, info.ocs.meta.message)?;
    // Raw response dump for debugging on the monitored host; the evaluator
    // only reads the first line.
    let raw = serde_json::to_string(info).map_err(io::Error::other)?;
    writeln!(out, "{}", raw)
}

fn emit_software(out: &mut impl Write, system: &System) -> io::Result<()> {
    segment_header(out, SOFTWARE_SEGMENT)?;
    writeln!(out, "{}", system.version)?;
    writeln!(out, "{}", system.freespace)?;

    let cpuload: Vec<String> = system.cpuload.iter().map(|load| load.to_string()).collect();
    writeln!(out, "{}", cpuload.join("|"))?;

    writeln!(
        out,
        "{}|{}|{}",
        system.mem_total,
        system.mem_free,
        system.mem_total.saturating_sub(system.mem_free)
    )?;
    writeln!(
        out,
        "{}|{}|{}",
        system.swap_total,
        system.swap_free,
        system.swap_total.saturating_sub(system.swap_free)
    )
}

fn emit_apps(out: &mut impl Write, system: &System) -> io::Result<()> {
    segment_header(out, APPS_SEGMENT)?;
    let apps = &system.apps;
    writeln!(
        out,
        "{}|{}",
        apps.num_installed, apps.num_updates_available
    )?;
    let updates = serde_json::to_string(&apps.app_updates).map_err(io::Error::other)?;
    writeln!(out, "{}", updates)
}

fn emit_server(out: &mut impl Write, info: &ServerInfo) -> io::Result<()> {
    segment_header(out, SERVER_SEGMENT)?;
    let usage = &info.ocs.data.server.php.opcache.memory_usage;
    writeln!(
        out,
        "{}|{}|{}|{}",
        usage.used_memory, usage.free_memory, usage.wasted_memory, usage.current_wasted_percentage
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ncmon_core::checks::{ServiceState, evaluate_all};
    use ncmon_core::segment::SegmentMap;

    const RESPONSE: &str = r#"{
      "ocs": {
        "meta": {"status": "ok", "statuscode": 200, "message": "OK"},
        "data": {
          "nextcloud": {
            "system": {
              "version": "29.0.1.1",
              "freespace": 412044423168,
              "cpuload": [0.5, 0.25, 1.0],
              "mem_total": 8000000000,
              "mem_free": 6000000000,
              "swap_total": 2000000000,
              "swap_free": 2000000000,
              "apps": {
                "num_installed": 42,
                "num_updates_available": 0,
                "app_updates": {}
              }
            }
          },
          "server": {
            "php": {
              "opcache": {
                "memory_usage": {
                  "used_memory": 111650824,
                  "free_memory": 22766072,
                  "wasted_memory": 5167624,
                  "current_wasted_percentage": 3.7
                }
              }
            }
          }
        }
      }
    }"#;

    fn fixture() -> ServerInfo {
        serde_json::from_str(RESPONSE).unwrap()
    }

    fn emit_to_string(info: &ServerInfo) -> String {
        let mut buf = Vec::new();
        emit_all(&mut buf, info).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn emits_segments_in_canonical_order() {
        let output = emit_to_string(&fixture());
        let markers: Vec<&str> = output
            .lines()
            .filter(|line| line.starts_with("<<<"))
            .collect();

        assert_eq!(
            markers,
            [
                "<<<nextcloud>>>",
                "<<<nextcloud_software>>>",
                "<<<nextcloud_apps>>>",
                "<<<nextcloud_server>>>",
            ]
        );
    }

    #[test]
    fn software_segment_carries_derived_used_counts() {
        let output = emit_to_string(&fixture());

        assert!(output.contains("29.0.1.1\n412044423168\n0.5|0.25|1\n"));
        // used = total - free
        assert!(output.contains("8000000000|6000000000|2000000000\n"));
        assert!(output.contains("2000000000|2000000000|0\n"));
    }

    #[test]
    fn status_and_server_lines_match_the_schema() {
        let output = emit_to_string(&fixture());

        assert!(output.contains("200|OK\n"));
        assert!(output.contains("111650824|22766072|5167624|3.7\n"));
        assert!(output.contains("42|0\n{}\n"));
    }

    #[test]
    fn emitted_output_evaluates_clean_end_to_end() {
        let output = emit_to_string(&fixture());
        let segments = SegmentMap::parse(&output);
        let reports = evaluate_all(&segments);

        assert_eq!(reports.len(), 4);
        for report in &reports {
            assert_eq!(
                report.outcome.state,
                ServiceState::Ok,
                "{}: {}",
                report.service,
                report.outcome.summary
            );
        }
    }

    #[test]
    fn free_above_total_saturates_instead_of_underflowing() {
        let mut info = fixture();
        info.ocs.data.nextcloud.system.mem_free = info.ocs.data.nextcloud.system.mem_total + 1;

        let output = emit_to_string(&info);
        assert!(output.contains("8000000000|8000000001|0\n"));
    }
}
