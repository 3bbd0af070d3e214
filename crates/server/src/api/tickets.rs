//! Ticket API handlers.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use ren_core::{
    CreateTicketRequest, ExecuteResponse, Ticket, TicketFilter, TicketPage, TicketStatus,
};

use super::error::ApiResult;
use crate::state::AppState;

/// Default limit for ticket queries
const DEFAULT_LIMIT: usize = 100;

// ============================================================================
// Request Types
// ============================================================================

/// Request body for executing a ticket
#[derive(Debug, Deserialize)]
pub struct ExecuteBody {
    pub ticket_id: String,
    /// Re-run a ticket that already reached a terminal state.
    #[serde(default)]
    pub force: bool,
}

/// Query parameters for listing tickets
#[derive(Debug, Deserialize)]
pub struct ListTicketsParams {
    /// Filter by status
    pub status: Option<TicketStatus>,
    /// Maximum number of tickets to return
    pub limit: Option<usize>,
    /// Pagination offset
    pub offset: Option<usize>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new ticket
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateTicketRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Ticket>)> {
    let Json(request) = payload?;
    let ticket = state.orchestrator().create(request)?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// Get a ticket by ID
pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Ticket>> {
    Ok(Json(state.orchestrator().get(&id)?))
}

/// Execute a ticket's command
pub async fn execute_ticket(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExecuteBody>, JsonRejection>,
) -> ApiResult<Json<ExecuteResponse>> {
    let Json(body) = payload?;
    Ok(Json(state.orchestrator().execute(&body.ticket_id, body.force)?))
}

/// List tickets with optional status filter
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListTicketsParams>, QueryRejection>,
) -> ApiResult<Json<TicketPage>> {
    let Query(params) = params?;

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let mut filter = TicketFilter::new().with_limit(limit).with_offset(offset);
    if let Some(status) = params.status {
        filter = filter.with_status(status);
    }

    Ok(Json(state.orchestrator().list(&filter)?))
}

/// Cancel a ticket that has not started executing
pub async fn cancel_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Ticket>> {
    Ok(Json(state.orchestrator().cancel(&id)?))
}
