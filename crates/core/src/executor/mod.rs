//! Command execution under safety constraints.
//!
//! The executor maps a command name and its parameter bag to a result bag.
//! It is synchronous and side-effect free: a failure is a business outcome the
//! orchestrator records on the ticket, never a process fault.

mod checks;
mod error;
mod safety;

pub use checks::{run_checks, ParamCheck};
pub use error::ExecutionError;
pub use safety::{SafetyExecutor, SafetyLimits};

use serde_json::{Map, Value};

/// String-keyed bag of JSON values (command parameters and results).
pub type Params = Map<String, Value>;

/// Executes a single command.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, command: &str, params: &Params) -> Result<Params, ExecutionError>;
}
