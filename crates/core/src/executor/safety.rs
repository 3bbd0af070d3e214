use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{run_checks, CommandExecutor, ExecutionError, ParamCheck, Params};

/// Fixed readings reported by the simulated scanner.
const SCAN_POINTS: u32 = 360;
const SCAN_OBSTACLES: u32 = 3;

/// Safety thresholds for motion commands.
///
/// Lower bounds are inclusive and default to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyLimits {
    /// Maximum speed in m/s (inclusive).
    pub max_speed_ms: f64,
    /// Maximum drive duration in seconds (inclusive).
    pub max_duration_seconds: u32,
    /// Exclusive upper bound for heading in degrees.
    pub max_direction_degrees: u32,
    #[serde(default)]
    pub min_speed_ms: f64,
    #[serde(default)]
    pub min_duration_seconds: f64,
    #[serde(default)]
    pub min_direction_degrees: f64,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_speed_ms: 3.0,
            max_duration_seconds: 300,
            max_direction_degrees: 360,
            min_speed_ms: 0.0,
            min_duration_seconds: 0.0,
            min_direction_degrees: 0.0,
        }
    }
}

impl SafetyLimits {
    /// Validation sequence for `drive`: presence, then types, then ranges.
    pub fn drive_checks(&self) -> Vec<ParamCheck> {
        vec![
            ParamCheck::Required { param: "speed" },
            ParamCheck::Required {
                param: "duration_seconds",
            },
            ParamCheck::Numeric {
                param: "speed",
                label: "Speed",
            },
            ParamCheck::Numeric {
                param: "duration_seconds",
                label: "Duration",
            },
            ParamCheck::Numeric {
                param: "direction",
                label: "Direction",
            },
            ParamCheck::Threshold {
                param: "speed",
                label: "Speed",
                limit: self.max_speed_ms,
                unit: "m/s",
            },
            ParamCheck::Minimum {
                param: "speed",
                label: "Speed",
                limit: self.min_speed_ms,
                unit: "m/s",
            },
            ParamCheck::Maximum {
                param: "duration_seconds",
                label: "Duration",
                limit: self.max_duration_seconds,
                unit: "s",
            },
            ParamCheck::Minimum {
                param: "duration_seconds",
                label: "Duration",
                limit: self.min_duration_seconds,
                unit: "s",
            },
            ParamCheck::HalfOpen {
                param: "direction",
                label: "Direction",
                min: self.min_direction_degrees,
                limit: self.max_direction_degrees,
            },
        ]
    }
}

/// Production executor: simulated drive/stop/scan with safety enforcement.
#[derive(Debug, Clone)]
pub struct SafetyExecutor {
    limits: SafetyLimits,
    drive_checks: Vec<ParamCheck>,
}

impl SafetyExecutor {
    pub fn new(limits: SafetyLimits) -> Self {
        Self {
            drive_checks: limits.drive_checks(),
            limits,
        }
    }

    pub fn limits(&self) -> &SafetyLimits {
        &self.limits
    }

    fn drive(&self, params: &Params) -> Result<Params, ExecutionError> {
        run_checks(&self.drive_checks, params)?;

        let speed = params.get("speed").cloned().unwrap_or_default();
        let duration = params.get("duration_seconds").cloned().unwrap_or_default();
        let direction = params.get("direction").cloned().unwrap_or(json!(0));

        let distance = speed.as_f64().unwrap_or_default() * duration.as_f64().unwrap_or_default();

        Ok(object(json!({
            "command": "drive",
            "executed": true,
            "speed": speed,
            "direction": direction,
            "duration_seconds": duration,
            "distance_traveled": distance,
        })))
    }
}

impl Default for SafetyExecutor {
    fn default() -> Self {
        Self::new(SafetyLimits::default())
    }
}

impl CommandExecutor for SafetyExecutor {
    fn execute(&self, command: &str, params: &Params) -> Result<Params, ExecutionError> {
        debug!(command, "Executing command");
        match command {
            "drive" => self.drive(params),
            "stop" => Ok(object(json!({
                "command": "stop",
                "executed": true,
                "status": "stopped",
            }))),
            "scan" => Ok(object(json!({
                "command": "scan",
                "executed": true,
                "scan_points": SCAN_POINTS,
                "obstacles_detected": SCAN_OBSTACLES,
            }))),
            other => Err(ExecutionError::UnknownCommand(other.to_string())),
        }
    }
}

fn object(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}
