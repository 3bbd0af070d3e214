//! Mock command executor for testing.

use std::collections::HashMap;
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Instant;

use serde_json::json;

use crate::executor::{CommandExecutor, ExecutionError, Params};
use crate::telemetry::fields;

/// A recorded execution for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedExecution {
    pub command: String,
    pub params: Params,
    pub timestamp: Instant,
}

#[derive(Debug, Default)]
struct GateState {
    closed: bool,
    waiting: usize,
}

/// Mock implementation of the CommandExecutor trait.
///
/// Provides controllable behavior for testing:
/// - Scripted result or error per command
/// - One-shot failure via `fail_next`
/// - A gate that parks executions until released, for observing the
///   `executing` state from another thread
///
/// # Example
///
/// ```rust,ignore
/// use ren_core::testing::MockExecutor;
///
/// let executor = MockExecutor::new();
/// executor.set_error("drive", ExecutionError::UnknownCommand("drive".into()));
///
/// let result = executor.execute("scan", &Params::new())?;
/// assert_eq!(executor.recorded_executions().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockExecutor {
    outcomes: Mutex<HashMap<String, Result<Params, ExecutionError>>>,
    next_error: Mutex<Option<ExecutionError>>,
    executions: Mutex<Vec<RecordedExecution>>,
    gate: Mutex<GateState>,
    gate_changed: Condvar,
}

impl MockExecutor {
    /// Create a mock that succeeds on every command with `{"command", "executed": true}`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `result` whenever `command` is executed.
    pub fn set_result(&self, command: &str, result: Params) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(command.to_string(), Ok(result));
    }

    /// Fail whenever `command` is executed.
    pub fn set_error(&self, command: &str, error: ExecutionError) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(command.to_string(), Err(error));
    }

    /// Fail the next execution regardless of command.
    pub fn fail_next(&self, error: ExecutionError) {
        *self.next_error.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    pub fn recorded_executions(&self) -> Vec<RecordedExecution> {
        self.executions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn execution_count(&self) -> usize {
        self.executions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Park every subsequent execution until [`release`](Self::release).
    pub fn hold(&self) {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner).closed = true;
    }

    /// Let parked executions finish.
    pub fn release(&self) {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner).closed = false;
        self.gate_changed.notify_all();
    }

    /// Block until `count` executions are parked at the gate.
    pub fn wait_for_parked(&self, count: usize) {
        let mut gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        while gate.waiting < count {
            gate = self
                .gate_changed
                .wait(gate)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn pass_gate(&self) {
        let mut gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        if !gate.closed {
            return;
        }
        gate.waiting += 1;
        self.gate_changed.notify_all();
        while gate.closed {
            gate = self
                .gate_changed
                .wait(gate)
                .unwrap_or_else(PoisonError::into_inner);
        }
        gate.waiting -= 1;
    }
}

impl CommandExecutor for MockExecutor {
    fn execute(&self, command: &str, params: &Params) -> Result<Params, ExecutionError> {
        self.executions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedExecution {
                command: command.to_string(),
                params: params.clone(),
                timestamp: Instant::now(),
            });

        self.pass_gate();

        if let Some(error) = self
            .next_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            return Err(error);
        }

        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(command)
            .cloned()
            .unwrap_or_else(|| Ok(fields(json!({ "command": command, "executed": true }))))
    }
}
