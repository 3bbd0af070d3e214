use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::executor::SafetyLimits;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub contracts: ContractsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8000
}

/// Telemetry sink configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    /// How many of the most recent metrics/events are kept for read-back.
    #[serde(default = "default_retention")]
    pub retention: usize,
    /// Mirror every record to the tracing log.
    #[serde(default = "default_log_records")]
    pub log_records: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            retention: default_retention(),
            log_records: default_log_records(),
        }
    }
}

fn default_retention() -> usize {
    100
}

fn default_log_records() -> bool {
    true
}

/// Safety thresholds applied by the command executor.
///
/// These are the fallback values; a loaded `actuator` contract overrides them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutorConfig {
    #[serde(default = "default_max_speed")]
    pub max_speed_ms: f64,
    #[serde(default = "default_max_duration")]
    pub max_duration_seconds: u32,
    #[serde(default = "default_max_direction")]
    pub max_direction_degrees: u32,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_speed_ms: default_max_speed(),
            max_duration_seconds: default_max_duration(),
            max_direction_degrees: default_max_direction(),
        }
    }
}

impl From<&ExecutorConfig> for SafetyLimits {
    fn from(config: &ExecutorConfig) -> Self {
        SafetyLimits {
            max_speed_ms: config.max_speed_ms,
            max_duration_seconds: config.max_duration_seconds,
            max_direction_degrees: config.max_direction_degrees,
            ..SafetyLimits::default()
        }
    }
}

fn default_max_speed() -> f64 {
    3.0
}

fn default_max_duration() -> u32 {
    300
}

fn default_max_direction() -> u32 {
    360
}

/// Contract registry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractsConfig {
    /// Directory holding `<name>.v<N>.json` contracts. Unset = no registry.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Name of the contract that describes actuator command parameters.
    #[serde(default = "default_actuator_contract")]
    pub actuator: String,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            actuator: default_actuator_contract(),
        }
    }
}

fn default_actuator_contract() -> String {
    "actuator".to_string()
}
