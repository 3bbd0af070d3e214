use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Telemetry retention window is not empty
/// - Executor thresholds are positive
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.telemetry.retention == 0 {
        return Err(ConfigError::ValidationError(
            "telemetry.retention must be at least 1".to_string(),
        ));
    }

    let executor = &config.executor;
    if !(executor.max_speed_ms.is_finite() && executor.max_speed_ms > 0.0) {
        return Err(ConfigError::ValidationError(format!(
            "executor.max_speed_ms must be a positive number, got {}",
            executor.max_speed_ms
        )));
    }
    if executor.max_duration_seconds == 0 {
        return Err(ConfigError::ValidationError(
            "executor.max_duration_seconds cannot be 0".to_string(),
        ));
    }
    if executor.max_direction_degrees == 0 {
        return Err(ConfigError::ValidationError(
            "executor.max_direction_degrees cannot be 0".to_string(),
        ));
    }

    if config.contracts.actuator.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "contracts.actuator cannot be empty".to_string(),
        ));
    }

    Ok(())
}
