use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use ren_core::{
    ContractsConfig, ExecutorConfig, SafetyLimits, ServerConfig, StatusCounts, TelemetryConfig,
};

use super::error::ApiResult;
use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

pub const SERVICE_NAME: &str = "orchestrator-ren";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub tickets: StatusCounts,
}

pub async fn health(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        service: SERVICE_NAME,
        version: VERSION,
        status: "operational",
        tickets: state.orchestrator().status_counts()?,
    }))
}

/// Loaded configuration plus the limits in force after contract resolution.
#[derive(Serialize)]
pub struct ConfigResponse<'a> {
    pub server: &'a ServerConfig,
    pub telemetry: &'a TelemetryConfig,
    pub executor: &'a ExecutorConfig,
    pub contracts: &'a ContractsConfig,
    pub effective_limits: &'a SafetyLimits,
    pub actuator_contract: Option<&'a str>,
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.config();
    Json(ConfigResponse {
        server: &config.server,
        telemetry: &config.telemetry,
        executor: &config.executor,
        contracts: &config.contracts,
        effective_limits: state.limits(),
        actuator_contract: state.actuator_contract(),
    })
    .into_response()
}

/// Prometheus text exposition.
pub async fn prometheus_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    collect_dynamic_metrics(&state);
    match encode_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
