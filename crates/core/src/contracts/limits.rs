use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use super::{Contract, ContractError, ContractRegistry};
use crate::executor::SafetyLimits;

const SPEED_MAX: &str = "/properties/params/properties/speed/maximum";
const DURATION_MAX: &str = "/properties/params/properties/duration_seconds/maximum";
const DIRECTION_MAX: &str = "/properties/params/properties/direction/exclusiveMaximum";
const SPEED_MIN: &str = "/properties/params/properties/speed/minimum";
const DURATION_MIN: &str = "/properties/params/properties/duration_seconds/minimum";
const DIRECTION_MIN: &str = "/properties/params/properties/direction/minimum";

impl SafetyLimits {
    /// Override limits with the bounds declared by an actuator contract.
    ///
    /// Bounds the contract does not declare keep their current value. A
    /// minimum is only taken when it is non-negative and below the resolved
    /// maximum.
    pub fn with_contract(self, document: &Value) -> Self {
        let integer = |pointer: &str| {
            document
                .pointer(pointer)
                .and_then(Value::as_u64)
                .and_then(|value| u32::try_from(value).ok())
        };
        let number = |pointer: &str| {
            document
                .pointer(pointer)
                .and_then(Value::as_f64)
                .filter(|value| value.is_finite())
        };

        let max_speed_ms = number(SPEED_MAX)
            .filter(|speed| *speed > 0.0)
            .unwrap_or(self.max_speed_ms);
        let max_duration_seconds = integer(DURATION_MAX)
            .filter(|duration| *duration > 0)
            .unwrap_or(self.max_duration_seconds);
        let max_direction_degrees = integer(DIRECTION_MAX)
            .filter(|direction| *direction > 0)
            .unwrap_or(self.max_direction_degrees);

        let minimum = |pointer: &str, max: f64, current: f64| {
            number(pointer)
                .filter(|min| *min >= 0.0 && *min < max)
                .unwrap_or(current)
        };

        Self {
            min_speed_ms: minimum(SPEED_MIN, max_speed_ms, self.min_speed_ms),
            min_duration_seconds: minimum(
                DURATION_MIN,
                f64::from(max_duration_seconds),
                self.min_duration_seconds,
            ),
            min_direction_degrees: minimum(
                DIRECTION_MIN,
                f64::from(max_direction_degrees),
                self.min_direction_degrees,
            ),
            max_speed_ms,
            max_duration_seconds,
            max_direction_degrees,
        }
    }
}

/// Resolve executor limits from the latest version of the named contract.
pub fn load_actuator_limits(
    dir: &Path,
    name: &str,
    fallback: SafetyLimits,
) -> Result<(SafetyLimits, Contract), ContractError> {
    let registry = ContractRegistry::open(dir)?;
    let contract = registry
        .latest(name)
        .cloned()
        .ok_or_else(|| ContractError::NotFound(name.to_string()))?;

    let document = contract.load()?;
    let limits = fallback.with_contract(&document);
    if limits == fallback {
        warn!(
            contract = %contract.file_name(),
            "Contract declares no parameter bounds, keeping configured limits"
        );
    }

    info!(
        contract = %contract.file_name(),
        max_speed_ms = limits.max_speed_ms,
        max_duration_seconds = limits.max_duration_seconds,
        max_direction_degrees = limits.max_direction_degrees,
        min_speed_ms = limits.min_speed_ms,
        min_duration_seconds = limits.min_duration_seconds,
        min_direction_degrees = limits.min_direction_degrees,
        "Loaded actuator limits"
    );

    Ok((limits, contract))
}
