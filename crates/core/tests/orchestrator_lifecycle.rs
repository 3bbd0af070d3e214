//! Orchestrator lifecycle integration tests.
//!
//! These tests verify the complete ticket lifecycle through the orchestrator:
//! pending -> executing -> completed | failed, plus forced re-execution,
//! cancellation and concurrent execute attempts on one ticket.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use prometheus::core::Collector;

use serde_json::json;

use ren_core::{
    metrics,
    testing::{fixtures, MockExecutor},
    CreateTicketRequest, ExecutionError, OrchestratorError, TicketFilter, TicketPriority,
    TicketStatus,
};

#[test]
fn test_new_ticket_is_pending_with_equal_timestamps() {
    let orchestrator = fixtures::orchestrator();
    let ticket = orchestrator
        .create(
            CreateTicketRequest::new("scan")
                .with_priority(TicketPriority::High)
                .with_timeout(30),
        )
        .unwrap();

    assert_eq!(ticket.status, TicketStatus::Pending);
    assert_eq!(ticket.created_at, ticket.updated_at);
    assert_eq!(ticket.priority, TicketPriority::High);
    assert_eq!(ticket.timeout_seconds, 30);
    assert!(ticket.started_at.is_none());
    assert!(ticket.result.is_none());
    assert!(ticket.error.is_none());
}

#[test]
fn test_repeated_get_returns_identical_snapshots() {
    let orchestrator = fixtures::orchestrator();
    let ticket = orchestrator.create(CreateTicketRequest::new("stop")).unwrap();

    let first = orchestrator.get(&ticket.id).unwrap();
    let second = orchestrator.get(&ticket.id).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, ticket);
}

#[test]
fn test_drive_completes_with_distance() {
    let orchestrator = fixtures::orchestrator();
    let ticket = orchestrator
        .create(fixtures::drive_request(1.5, 10.0, 90.0))
        .unwrap();

    let response = orchestrator.execute(&ticket.id, false).unwrap();
    assert_eq!(response.ticket_id, ticket.id);
    assert_eq!(response.status, TicketStatus::Completed);
    assert!(response.execution_time_ms >= 0.0);

    let result = response.result.unwrap();
    assert_eq!(result["executed"], json!(true));
    assert_eq!(result["distance_traveled"], json!(15.0));
    assert_eq!(result["direction"], json!(90.0));
}

#[test]
fn test_drive_without_duration_fails_with_missing_parameter() {
    let orchestrator = fixtures::orchestrator();
    let params = ren_core::telemetry::fields(json!({"speed": 1.0}));
    let ticket = orchestrator
        .create(CreateTicketRequest::new("drive").with_params(params))
        .unwrap();

    let response = orchestrator.execute(&ticket.id, false).unwrap();
    assert_eq!(response.status, TicketStatus::Failed);
    assert_eq!(
        response.error.as_deref(),
        Some("Missing required parameter: duration_seconds")
    );

    let stored = orchestrator.get(&ticket.id).unwrap();
    assert_eq!(stored.error, response.error);
    assert!(stored.result.is_none());
    assert!(stored.completed_at.is_some());
}

#[test]
fn test_unknown_ticket_leaves_store_unchanged() {
    let orchestrator = fixtures::orchestrator();
    orchestrator.create(CreateTicketRequest::new("scan")).unwrap();
    let before = orchestrator.list(&TicketFilter::new()).unwrap();

    let err = orchestrator.execute("tick-20250101-deadbeef", false).unwrap_err();
    assert!(matches!(err, OrchestratorError::TicketNotFound(_)));
    assert_eq!(orchestrator.list(&TicketFilter::new()).unwrap(), before);
}

#[test]
fn test_completed_ticket_requires_force() {
    let orchestrator = fixtures::orchestrator();
    let ticket = orchestrator.create(CreateTicketRequest::new("scan")).unwrap();
    let first = orchestrator.execute(&ticket.id, false).unwrap();
    let snapshot = orchestrator.get(&ticket.id).unwrap();

    let err = orchestrator.execute(&ticket.id, false).unwrap_err();
    assert!(matches!(err, OrchestratorError::Conflict(_)));
    assert_eq!(orchestrator.get(&ticket.id).unwrap(), snapshot);

    // Timestamps are millisecond-resolution at worst; make the rerun distinguishable.
    thread::sleep(Duration::from_millis(5));
    let again = orchestrator.execute(&ticket.id, true).unwrap();
    assert_eq!(again.status, TicketStatus::Completed);
    assert_eq!(again.result, first.result);

    let rerun = orchestrator.get(&ticket.id).unwrap();
    assert!(rerun.started_at > snapshot.started_at);
    assert!(rerun.completed_at > snapshot.completed_at);
    assert!(rerun.updated_at > snapshot.updated_at);
    assert!(rerun.started_at > snapshot.completed_at);
    assert_eq!(rerun.created_at, snapshot.created_at);
}

#[test]
fn test_forced_rerun_overwrites_previous_outcome() {
    let executor = Arc::new(MockExecutor::new());
    let orchestrator = fixtures::orchestrator_with(executor.clone());
    let ticket = orchestrator.create(CreateTicketRequest::new("scan")).unwrap();

    executor.fail_next(ExecutionError::UnknownCommand("scan".to_string()));
    let failed = orchestrator.execute(&ticket.id, false).unwrap();
    assert_eq!(failed.status, TicketStatus::Failed);
    assert!(failed.error.is_some());

    let rerun = orchestrator.execute(&ticket.id, true).unwrap();
    assert_eq!(rerun.status, TicketStatus::Completed);
    assert!(rerun.error.is_none());

    let stored = orchestrator.get(&ticket.id).unwrap();
    assert!(stored.error.is_none());
    assert!(stored.result.is_some());
    assert_eq!(executor.execution_count(), 2);
}

#[test]
fn test_list_failed_newest_first_with_pagination() {
    let orchestrator = fixtures::orchestrator();
    let mut failed_ids = Vec::new();
    for i in 0..4 {
        let ticket = orchestrator
            .create(fixtures::drive_request(5.0 + i as f64, 10.0, 0.0))
            .unwrap();
        orchestrator.execute(&ticket.id, false).unwrap();
        failed_ids.push(ticket.id);
    }
    let ok = orchestrator.create(CreateTicketRequest::new("stop")).unwrap();
    orchestrator.execute(&ok.id, false).unwrap();

    let filter = TicketFilter::new()
        .with_status(TicketStatus::Failed)
        .with_limit(2)
        .with_offset(1);
    let page = orchestrator.list(&filter).unwrap();

    assert_eq!(page.total, 4);
    assert_eq!(page.limit, 2);
    assert_eq!(page.offset, 1);
    assert!(page
        .tickets
        .iter()
        .all(|t| t.status == TicketStatus::Failed));

    let ids: Vec<_> = page.tickets.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, vec![failed_ids[2].clone(), failed_ids[1].clone()]);
}

#[test]
fn test_cancel_then_forced_execute() {
    let orchestrator = fixtures::orchestrator();
    let ticket = orchestrator.create(CreateTicketRequest::new("scan")).unwrap();

    orchestrator.cancel(&ticket.id).unwrap();
    assert!(matches!(
        orchestrator.execute(&ticket.id, false),
        Err(OrchestratorError::Conflict(_))
    ));

    let response = orchestrator.execute(&ticket.id, true).unwrap();
    assert_eq!(response.status, TicketStatus::Completed);
}

#[test]
fn test_executing_ticket_rejects_execute_and_cancel() {
    let executor = Arc::new(MockExecutor::new());
    let orchestrator = Arc::new(fixtures::orchestrator_with(executor.clone()));
    let ticket = orchestrator.create(CreateTicketRequest::new("scan")).unwrap();

    executor.hold();
    let worker = {
        let orchestrator = Arc::clone(&orchestrator);
        let id = ticket.id.clone();
        thread::spawn(move || orchestrator.execute(&id, false))
    };
    executor.wait_for_parked(1);

    assert_eq!(
        orchestrator.get(&ticket.id).unwrap().status,
        TicketStatus::Executing
    );
    assert!(matches!(
        orchestrator.execute(&ticket.id, true),
        Err(OrchestratorError::Conflict(_))
    ));
    assert!(matches!(
        orchestrator.cancel(&ticket.id),
        Err(OrchestratorError::Conflict(_))
    ));
    assert_eq!(orchestrator.status_counts().unwrap().executing, 1);

    executor.release();
    let response = worker.join().unwrap().unwrap();
    assert_eq!(response.status, TicketStatus::Completed);
    assert_eq!(executor.execution_count(), 1);
}

#[test]
fn test_concurrent_execute_runs_exactly_once() {
    let executor = Arc::new(MockExecutor::new());
    let orchestrator = fixtures::orchestrator_with(executor.clone());
    let ticket = orchestrator.create(CreateTicketRequest::new("scan")).unwrap();

    let outcomes: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| orchestrator.execute(&ticket.id, false)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(outcomes
        .iter()
        .filter_map(|outcome| outcome.as_ref().err())
        .all(|err| matches!(err, OrchestratorError::Conflict(_))));
    assert_eq!(executor.execution_count(), 1);
}

#[test]
fn test_telemetry_trail_for_failed_execution() {
    let orchestrator = fixtures::orchestrator();
    let ticket = orchestrator
        .create(fixtures::drive_request(3.5, 10.0, 0.0))
        .unwrap();
    orchestrator.execute(&ticket.id, false).unwrap();

    let events = orchestrator.telemetry().recent_events();
    let types: Vec<_> = events.items.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        types,
        vec!["ticket_created", "execution_started", "execution_failed"]
    );
    assert!(events.items[2].data["error"]
        .as_str()
        .unwrap()
        .contains("threshold"));

    let metrics = orchestrator.telemetry().recent_metrics();
    let failure = metrics
        .items
        .iter()
        .find(|m| m.name == "execution.failure")
        .unwrap();
    assert_eq!(failure.value, 1.0);
    assert_eq!(failure.tags["command"], json!("drive"));
}

#[test]
fn test_free_form_commands_keep_metric_series_bounded() {
    let orchestrator = fixtures::orchestrator();
    for i in 0..200 {
        let ticket = orchestrator
            .create(CreateTicketRequest::new(format!("junk-{}", i)))
            .unwrap();
        if i % 2 == 0 {
            orchestrator.execute(&ticket.id, false).unwrap();
        } else {
            orchestrator.cancel(&ticket.id).unwrap();
        }
    }

    let series = |collector: &dyn Collector| -> usize {
        collector
            .collect()
            .iter()
            .map(|family| family.get_metric().len())
            .sum()
    };
    // drive, stop, scan, other
    assert!(series(&*metrics::TICKETS_CREATED) <= 4);
    assert!(series(&*metrics::TICKETS_CANCELLED) <= 4);
    // times success/failed
    assert!(series(&*metrics::EXECUTIONS_TOTAL) <= 8);
    assert!(series(&*metrics::EXECUTION_DURATION) <= 8);

    assert!(metrics::TICKETS_CREATED.with_label_values(&["other"]).get() >= 200);
    assert!(
        metrics::EXECUTIONS_TOTAL
            .with_label_values(&["other", "failed"])
            .get()
            >= 100
    );
}
