//! Ordered, independent parameter validators.
//!
//! Each check looks at one parameter and either passes or returns a structured
//! [`ExecutionError`]. [`run_checks`] stops at the first failure, so the order
//! of the list is the order in which violations are reported. Checks on an
//! absent optional parameter pass; presence is enforced by
//! [`ParamCheck::Required`] alone.

use serde_json::Value;

use super::{ExecutionError, Params};

#[derive(Debug, Clone, PartialEq)]
pub enum ParamCheck {
    /// Parameter must be present.
    Required { param: &'static str },
    /// Parameter must be a JSON number.
    Numeric {
        param: &'static str,
        label: &'static str,
    },
    /// Safety threshold: value must not exceed `limit`.
    Threshold {
        param: &'static str,
        label: &'static str,
        limit: f64,
        unit: &'static str,
    },
    /// Upper bound: value must not exceed `limit`.
    Maximum {
        param: &'static str,
        label: &'static str,
        limit: u32,
        unit: &'static str,
    },
    /// Lower bound: value must be at least `limit`.
    Minimum {
        param: &'static str,
        label: &'static str,
        limit: f64,
        unit: &'static str,
    },
    /// Value must lie in `[min, limit)`.
    HalfOpen {
        param: &'static str,
        label: &'static str,
        min: f64,
        limit: u32,
    },
}

impl ParamCheck {
    pub fn param(&self) -> &'static str {
        match self {
            ParamCheck::Required { param }
            | ParamCheck::Numeric { param, .. }
            | ParamCheck::Threshold { param, .. }
            | ParamCheck::Maximum { param, .. }
            | ParamCheck::Minimum { param, .. }
            | ParamCheck::HalfOpen { param, .. } => param,
        }
    }

    pub fn apply(&self, params: &Params) -> Result<(), ExecutionError> {
        let value = params.get(self.param());

        if let ParamCheck::Required { param } = self {
            return match value {
                Some(_) => Ok(()),
                None => Err(ExecutionError::MissingParameter {
                    param: param.to_string(),
                }),
            };
        }

        let Some(value) = value else {
            return Ok(());
        };

        if let ParamCheck::Numeric { label, .. } = self {
            return match value {
                Value::Number(_) => Ok(()),
                other => Err(ExecutionError::NotNumeric {
                    label: label.to_string(),
                    actual: json_type_name(other).to_string(),
                }),
            };
        }

        // Range checks run after the numeric checks; a non-number here means
        // the caller built the list out of order, so there is nothing to compare.
        let Some(number) = value.as_f64() else {
            return Ok(());
        };

        match self {
            ParamCheck::Threshold {
                label, limit, unit, ..
            } if number > *limit => Err(ExecutionError::ThresholdExceeded {
                label: label.to_string(),
                value: value.to_string(),
                limit: *limit,
                unit: unit.to_string(),
            }),
            ParamCheck::Maximum {
                label, limit, unit, ..
            } if number > f64::from(*limit) => Err(ExecutionError::AboveMaximum {
                label: label.to_string(),
                value: value.to_string(),
                limit: *limit,
                unit: unit.to_string(),
            }),
            ParamCheck::Minimum {
                label, limit, unit, ..
            } if number < *limit => {
                if *limit == 0.0 {
                    Err(ExecutionError::Negative {
                        label: label.to_string(),
                        value: value.to_string(),
                    })
                } else {
                    Err(ExecutionError::BelowMinimum {
                        label: label.to_string(),
                        value: value.to_string(),
                        limit: *limit,
                        unit: unit.to_string(),
                    })
                }
            }
            ParamCheck::HalfOpen {
                label, min, limit, ..
            } if !(*min..f64::from(*limit)).contains(&number) => {
                Err(ExecutionError::OutOfRange {
                    label: label.to_string(),
                    value: value.to_string(),
                    min: *min,
                    limit: *limit,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Apply `checks` in order, reporting the first violation.
pub fn run_checks(checks: &[ParamCheck], params: &Params) -> Result<(), ExecutionError> {
    checks.iter().try_for_each(|check| check.apply(params))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
