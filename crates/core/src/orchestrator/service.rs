//! Ticket orchestrator implementation.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::executor::{CommandExecutor, ExecutionError};
use crate::metrics;
use crate::telemetry::{fields, Fields, TelemetrySink};
use crate::ticket::{Ticket, TicketError, TicketFilter, TicketStatus, TicketStore};

use super::types::{
    CreateTicketRequest, ExecuteResponse, OrchestratorError, StatusCounts, TicketPage,
};

/// Drives tickets through the lifecycle state machine.
pub struct TicketOrchestrator {
    store: Arc<dyn TicketStore>,
    executor: Arc<dyn CommandExecutor>,
    telemetry: Arc<TelemetrySink>,
}

impl TicketOrchestrator {
    pub fn new(
        store: Arc<dyn TicketStore>,
        executor: Arc<dyn CommandExecutor>,
        telemetry: Arc<TelemetrySink>,
    ) -> Self {
        Self {
            store,
            executor,
            telemetry,
        }
    }

    pub fn telemetry(&self) -> &Arc<TelemetrySink> {
        &self.telemetry
    }

    /// Validate the request and store a new `Pending` ticket.
    pub fn create(&self, request: CreateTicketRequest) -> Result<Ticket, OrchestratorError> {
        request.validate()?;

        let now = Utc::now();
        let ticket = Ticket::new(
            Ticket::generate_id(now),
            request.command,
            request.params,
            request.priority,
            request.timeout_seconds,
            request.metadata,
            now,
        );
        self.store.insert(ticket.clone())?;

        metrics::TICKETS_CREATED
            .with_label_values(&[metrics::command_label(&ticket.command)])
            .inc();

        self.telemetry.emit_event(
            "ticket_created",
            fields(json!({
                "ticket_id": ticket.id,
                "command": ticket.command,
                "priority": ticket.priority,
            })),
        );
        self.telemetry.emit_metric(
            "tickets.created",
            1.0,
            fields(json!({ "command": ticket.command })),
        );
        let total = self.store.count(&TicketFilter::new())?;
        self.telemetry
            .emit_metric("tickets.total", total as f64, Fields::new());

        info!(
            ticket_id = %ticket.id,
            command = %ticket.command,
            priority = %ticket.priority,
            "Created ticket"
        );

        Ok(ticket)
    }

    pub fn get(&self, id: &str) -> Result<Ticket, OrchestratorError> {
        Ok(self.store.get(id)?)
    }

    /// Run the ticket's command.
    ///
    /// Terminal tickets are refused unless `force` is set; a ticket that is
    /// already executing is always refused. Executor failures are recorded on
    /// the ticket and reported in the response, never returned as `Err`.
    pub fn execute(&self, id: &str, force: bool) -> Result<ExecuteResponse, OrchestratorError> {
        let mut forced = false;
        let ticket = self.store.update(id, &mut |ticket| {
            match ticket.status {
                TicketStatus::Executing => {
                    return Err(invalid_state(
                        ticket,
                        "execute",
                        "Ticket is already executing".to_string(),
                    ));
                }
                status if status.is_terminal() && !force => {
                    return Err(invalid_state(
                        ticket,
                        "execute",
                        format!(
                            "Ticket already in terminal state: {}. Use force=true to re-execute.",
                            status
                        ),
                    ));
                }
                status => forced = status.is_terminal(),
            }

            let now = Utc::now();
            ticket.status = TicketStatus::Executing;
            ticket.started_at = Some(now);
            ticket.updated_at = now;
            ticket.completed_at = None;
            ticket.result = None;
            ticket.error = None;
            Ok(())
        })?;

        if forced {
            metrics::FORCED_EXECUTIONS
                .with_label_values(&[metrics::command_label(&ticket.command)])
                .inc();
            debug!(ticket_id = %ticket.id, "Forced re-execution");
        }

        self.telemetry.emit_event(
            "execution_started",
            fields(json!({ "ticket_id": ticket.id, "command": ticket.command })),
        );

        let started = Instant::now();
        let outcome = self.executor.execute(&ticket.command, &ticket.params);
        let elapsed = started.elapsed();
        let execution_time_ms = elapsed.as_secs_f64() * 1000.0;

        let finished = self.store.update(id, &mut |ticket| {
            let now = Utc::now();
            match &outcome {
                Ok(result) => {
                    ticket.status = TicketStatus::Completed;
                    ticket.result = Some(result.clone());
                }
                Err(e) => {
                    ticket.status = TicketStatus::Failed;
                    ticket.error = Some(e.to_string());
                }
            }
            ticket.completed_at = Some(now);
            ticket.updated_at = now;
            Ok(())
        })?;

        let result_label = match &outcome {
            Ok(_) => "success",
            Err(_) => "failed",
        };
        metrics::EXECUTIONS_TOTAL
            .with_label_values(&[metrics::command_label(&finished.command), result_label])
            .inc();
        metrics::EXECUTION_DURATION
            .with_label_values(&[metrics::command_label(&finished.command), result_label])
            .observe(elapsed.as_secs_f64());

        let message = match &outcome {
            Ok(_) => {
                self.record_success(&finished, execution_time_ms);
                "Execution completed successfully".to_string()
            }
            Err(e) => {
                self.record_failure(&finished, e, execution_time_ms);
                format!("Execution failed: {}", e)
            }
        };

        Ok(ExecuteResponse {
            ticket_id: finished.id,
            status: finished.status,
            result: finished.result,
            error: finished.error,
            execution_time_ms,
            message,
        })
    }

    fn record_success(&self, ticket: &Ticket, execution_time_ms: f64) {
        self.telemetry.emit_event(
            "execution_completed",
            fields(json!({
                "ticket_id": ticket.id,
                "command": ticket.command,
                "execution_time_ms": execution_time_ms,
            })),
        );
        self.telemetry.emit_metric(
            "execution.latency_ms",
            execution_time_ms,
            fields(json!({ "command": ticket.command, "status": "success" })),
        );
        self.telemetry.emit_metric(
            "execution.success",
            1.0,
            fields(json!({ "command": ticket.command })),
        );

        info!(
            ticket_id = %ticket.id,
            command = %ticket.command,
            execution_time_ms,
            "Execution completed"
        );
    }

    fn record_failure(&self, ticket: &Ticket, error: &ExecutionError, execution_time_ms: f64) {
        self.telemetry.emit_event(
            "execution_failed",
            fields(json!({
                "ticket_id": ticket.id,
                "command": ticket.command,
                "error": error.to_string(),
                "execution_time_ms": execution_time_ms,
            })),
        );
        self.telemetry.emit_metric(
            "execution.latency_ms",
            execution_time_ms,
            fields(json!({ "command": ticket.command, "status": "failed" })),
        );
        self.telemetry.emit_metric(
            "execution.failure",
            1.0,
            fields(json!({ "command": ticket.command })),
        );

        warn!(
            ticket_id = %ticket.id,
            command = %ticket.command,
            error = %error,
            "Execution failed"
        );
    }

    /// Matching tickets newest first, with the pre-pagination total.
    pub fn list(&self, filter: &TicketFilter) -> Result<TicketPage, OrchestratorError> {
        let total = self.store.count(filter)?;
        let tickets = self.store.list(filter)?;
        Ok(TicketPage {
            total,
            limit: filter.limit,
            offset: filter.offset,
            tickets,
        })
    }

    /// Withdraw a ticket that has not started executing.
    pub fn cancel(&self, id: &str) -> Result<Ticket, OrchestratorError> {
        let mut previous = TicketStatus::Pending;
        let ticket = self.store.update(id, &mut |ticket| {
            if !ticket.status.can_transition_to(TicketStatus::Cancelled) {
                return Err(invalid_state(
                    ticket,
                    "cancel",
                    format!("Cannot cancel ticket in state: {}", ticket.status),
                ));
            }
            previous = ticket.status;
            ticket.status = TicketStatus::Cancelled;
            ticket.updated_at = Utc::now();
            Ok(())
        })?;

        metrics::TICKETS_CANCELLED
            .with_label_values(&[metrics::command_label(&ticket.command)])
            .inc();
        self.telemetry.emit_event(
            "ticket_cancelled",
            fields(json!({
                "ticket_id": ticket.id,
                "command": ticket.command,
                "previous_status": previous,
            })),
        );

        info!(ticket_id = %ticket.id, previous_status = %previous, "Cancelled ticket");

        Ok(ticket)
    }

    pub fn status_counts(&self) -> Result<StatusCounts, OrchestratorError> {
        let mut counts = StatusCounts {
            total: self.store.count(&TicketFilter::new())?,
            ..StatusCounts::default()
        };
        for status in TicketStatus::ALL {
            let count = self.store.count(&TicketFilter::new().with_status(status))?;
            counts.set(status, count);
        }
        Ok(counts)
    }
}

fn invalid_state(ticket: &Ticket, operation: &str, reason: String) -> TicketError {
    TicketError::InvalidState {
        ticket_id: ticket.id.clone(),
        current_state: ticket.status,
        operation: operation.to_string(),
        reason,
    }
}
