//! Telemetry read-back handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use ren_core::{EventRecord, MetricRecord};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    /// Total metrics emitted since startup.
    pub count: u64,
    pub metrics: Vec<MetricRecord>,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    /// Total events emitted since startup.
    pub count: u64,
    pub events: Vec<EventRecord>,
}

pub async fn recent_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsResponse> {
    let snapshot = state.telemetry().recent_metrics();
    Json(MetricsResponse {
        count: snapshot.count,
        metrics: snapshot.items,
    })
}

pub async fn recent_events(State(state): State<Arc<AppState>>) -> Json<EventsResponse> {
    let snapshot = state.telemetry().recent_events();
    Json(EventsResponse {
        count: snapshot.count,
        events: snapshot.items,
    })
}
