//! Typed schema for the Nextcloud serverinfo OCS API response.
//!
//! Deserializing into explicit structs makes a missing or mistyped field a
//! decode error at the HTTP boundary instead of a lookup failure deep inside
//! a check. Only the fields the agent actually emits are modeled; serde
//! skips anything else the API adds.

use serde::{Deserialize, Serialize};

/// Top-level response of `GET /ocs/v2.php/apps/serverinfo/api/v1/info?format=json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub ocs: Ocs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ocs {
    pub meta: Meta,
    pub data: Data,
}

/// Request status reported by the OCS envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub status: String,
    pub statuscode: u64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Data {
    pub nextcloud: Nextcloud,
    pub server: Server,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nextcloud {
    pub system: System,
}

/// Host-level numbers reported by the serverinfo app.
///
/// Memory and swap are raw byte counts; `cpuload` is the 1/5/15 minute
/// load average list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct System {
    pub version: String,
    pub freespace: i64,
    pub cpuload: Vec<f64>,
    pub mem_total: u64,
    pub mem_free: u64,
    pub swap_total: u64,
    pub swap_free: u64,
    pub apps: Apps,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Apps {
    pub num_installed: u64,
    pub num_updates_available: u64,
    /// Pending update details, passed through to the wire format verbatim.
    #[serde(default)]
    pub app_updates: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub php: Php,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Php {
    pub opcache: Opcache,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opcache {
    pub memory_usage: OpcacheMemoryUsage,
}

/// `opcache_get_status()` memory block as exposed by serverinfo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpcacheMemoryUsage {
    pub used_memory: u64,
    pub free_memory: u64,
    pub wasted_memory: u64,
    pub current_wasted_percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    pub const FIXTURE: &str = r#"{
      "ocs": {
        "meta": {"status": "ok", "statuscode": 200, "message": "OK"},
        "data": {
          "nextcloud": {
            "system": {
              "version": "29.0.1.1",
              "theme": "",
              "freespace": 412044423168,
              "cpuload": [0.5, 0.25, 1.0],
              "mem_total": 8000000000,
              "mem_free": 6000000000,
              "swap_total": 2000000000,
              "swap_free": 2000000000,
              "apps": {
                "num_installed": 42,
                "num_updates_available": 1,
                "app_updates": {"calendar": "4.7.6"}
              }
            }
          },
          "server": {
            "webserver": "nginx",
            "php": {
              "version": "8.3.8",
              "opcache": {
                "opcache_enabled": true,
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

    #[test]
    fn decodes_the_serverinfo_fixture() {
        let info: ServerInfo = serde_json::from_str(FIXTURE).unwrap();

        assert_eq!(info.ocs.meta.statuscode, 200);
        assert_eq!(info.ocs.meta.message, "OK");

        let system = &info.ocs.data.nextcloud.system;
        assert_eq!(system.version, "29.0.1.1");
        assert_eq!(system.mem_total, 8000000000);
        assert_eq!(system.cpuload, vec![0.5, 0.25, 1.0]);
        assert_eq!(system.apps.num_updates_available, 1);
        assert_eq!(
            system.apps.app_updates["calendar"],
            serde_json::json!("4.7.6")
        );

        let opcache = &info.ocs.data.server.php.opcache.memory_usage;
        assert_eq!(opcache.used_memory, 111650824);
        assert_eq!(opcache.current_wasted_percentage, 3.7);
    }

    #[test]
    fn missing_field_is_a_decode_error() {
        let broken = FIXTURE.replace("\"statuscode\": 200,", "");
        assert!(serde_json::from_str::<ServerInfo>(&broken).is_err());
    }

    #[test]
    fn absent_app_updates_defaults_to_null() {
        let trimmed = FIXTURE.replace(",\n                \"app_updates\": {\"calendar\": \"4.7.6\"}", "");
        let info: ServerInfo = serde_json::from_str(&trimmed).unwrap();
        assert!(info.ocs.data.nextcloud.system.apps.app_updates.is_null());
    }
}
