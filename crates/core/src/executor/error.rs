use thiserror::Error;

/// Reasons a command is refused.
///
/// The display text is stored verbatim on failed tickets.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExecutionError {
    #[error("Missing required parameter: {param}")]
    MissingParameter { param: String },

    #[error("{label} must be numeric, got {actual}")]
    NotNumeric { label: String, actual: String },

    #[error("{label} {value} exceeds safety threshold of {limit:?} {unit}")]
    ThresholdExceeded {
        label: String,
        value: String,
        limit: f64,
        unit: String,
    },

    #[error("{label} {value}{unit} exceeds maximum of {limit}{unit}")]
    AboveMaximum {
        label: String,
        value: String,
        limit: u32,
        unit: String,
    },

    #[error("{label} must be non-negative, got {value}")]
    Negative { label: String, value: String },

    #[error("{label} {value} is below minimum of {limit} {unit}")]
    BelowMinimum {
        label: String,
        value: String,
        limit: f64,
        unit: String,
    },

    #[error("{label} {value} must be in range [{min}, {limit})")]
    OutOfRange {
        label: String,
        value: String,
        min: f64,
        limit: u32,
    },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}
