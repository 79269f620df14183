//! Configuration model. Loaded by `infrastructure::config::ConfigLoader`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub orchestrator: OrchestratorConfig,
    pub organizations: OrganizationConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Tick intervals for the periodic task publisher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Seconds between publish-eligibility sweeps over all (org, kind) pairs.
    pub task_tick_secs: u64,
    /// Seconds between reconciliations of the org map against the org service.
    pub org_refresh_secs: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            task_tick_secs: 5,
            org_refresh_secs: 5 * 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationConfig {
    /// TTL in seconds for positively cached organization records.
    /// Zero disables expiration.
    pub cache_ttl_secs: u64,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self { cache_ttl_secs: 300 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: ".flightdeck/flightdeck.db".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of: trace, debug, info, warn, error.
    pub level: String,
    /// One of: json, pretty.
    pub format: String,
    /// Directory for rotated log files. Stdout-only when unset.
    pub log_dir: Option<String>,
    /// File rotation policy. One of: daily, hourly, never.
    pub rotation: String,
    /// Whether to keep the stdout layer when file output is configured.
    pub enable_stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            log_dir: None,
            rotation: "daily".to_string(),
            enable_stdout: true,
        }
    }
}
