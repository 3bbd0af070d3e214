use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::metrics_middleware;
use super::{handlers, telemetry, tickets};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health, config and scrape endpoint
        .route("/", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::prometheus_metrics))
        // Tickets
        .route("/ticket", post(tickets::create_ticket))
        .route(
            "/ticket/{id}",
            get(tickets::get_ticket).delete(tickets::cancel_ticket),
        )
        .route("/execute", post(tickets::execute_ticket))
        .route("/tickets", get(tickets::list_tickets))
        // Telemetry read-back
        .route("/telemetry/metrics", get(telemetry::recent_metrics))
        .route("/telemetry/events", get(telemetry::recent_events))
        .route_layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
