//! Agent configuration.
//!
//! The collector reads one YAML file and passes the resulting struct down
//! explicitly; there is no process-wide configuration state.

use std::path::Path;

use serde::Deserialize;

/// Connection settings for the serverinfo API.
///
/// ```yaml
/// schema: https
/// server: cloud.example.org
/// api_path: ocs/v2.php/apps/serverinfo/api/v1/info?format=json
/// username: monitoring
/// password: secret
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    pub schema: String,
    pub server: String,
    pub api_path: String,
    pub username: String,
    pub password: String,
}

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "config: {}", err),
            ConfigError::Yaml(err) => write!(f, "config: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AgentConfig {
    /// Loads the configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_yaml::from_str(&raw).map_err(ConfigError::Yaml)
    }

    /// Full URL of the serverinfo endpoint.
    pub fn url(&self) -> String {
        format!("{}://{}/{}", self.schema, self.server, self.api_path)
    }
}
