//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness
//! - `/readyz`  : readiness (503 until every listener is receiving)
//! - `/metrics` : Prometheus text format
//! - `/status`  : JSON summary

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::app_state::{AppState, ListenerState};
use crate::obs::exposition;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_ready() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "starting")
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = exposition::render(&state);

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, exposition::CONTENT_TYPE)],
        body,
    )
        .into_response()
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub uptime_secs: u64,
    pub series: usize,
    pub heartbeat_ports: usize,
    pub listeners: Vec<ListenerStatus>,
}

#[derive(Debug, Serialize)]
pub struct ListenerStatus {
    pub port: u16,
    pub state: ListenerState,
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let registry = state.registry();
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime().as_secs(),
        series: registry.series_count(),
        heartbeat_ports: registry.heartbeat_port_count(),
        listeners: state
            .listener_states()
            .into_iter()
            .map(|(port, state)| ListenerStatus { port, state })
            .collect(),
    })
}
