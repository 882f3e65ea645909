//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::state::{AppState, DispatchError, TimerState};
use super::responses::{
    ApiResponse, HealthResponse, IntervalRequest, SecondsInterval, StatusResponse, TextInterval,
};

/// Handle POST /toggle - Start, pause or resume the stopwatch
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.toggle() {
        Ok(snapshot) => {
            info!("Toggle endpoint called - timer now {:?}", snapshot.phase);
            Ok(Json(ApiResponse::phase(
                format!("Timer is now {:?}", snapshot.phase),
                snapshot,
            )))
        }
        Err(e) => {
            error!("Failed to toggle timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Return the stopwatch to zero
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset() {
        Ok(snapshot) => {
            info!("Reset endpoint called - timer cleared");
            Ok(Json(ApiResponse::phase("Timer reset".to_string(), snapshot)))
        }
        Err(e) => {
            error!("Failed to reset timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle PUT /interval - Change or disable the alert interval
pub async fn interval_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<IntervalRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected malformed interval body: {}", rejection);
            return Err(rejected(&state, rejection.body_text()));
        }
    };

    let result = match &request {
        IntervalRequest::Text(TextInterval { text }) => state.set_interval_text(text),
        IntervalRequest::Seconds(SecondsInterval { seconds }) => state.set_interval(*seconds),
    };

    match result {
        Ok(snapshot) => {
            info!("Interval endpoint called - interval {:?}", snapshot.interval_seconds);
            let message = match snapshot.interval_seconds {
                Some(seconds) => format!("Interval set to {} seconds", seconds),
                None => "Interval disabled".to_string(),
            };
            Ok(Json(ApiResponse::phase(message, snapshot)))
        }
        Err(DispatchError::Interval(e)) => {
            warn!("Rejected interval request {:?}: {}", request, e);
            Err(rejected(&state, e.to_string()))
        }
        Err(e) => Err(internal_error(e)),
    }
}

/// Handle POST /reconcile - Fold a host-detected suspension gap
pub async fn reconcile_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reconcile() {
        Ok(snapshot) => {
            info!("Reconcile endpoint called - elapsed {}", snapshot.formatted_time);
            Ok(Json(ApiResponse::phase("Timer reconciled".to_string(), snapshot)))
        }
        Err(e) => {
            error!("Failed to reconcile timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the current snapshot and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = state.get_snapshot().map_err(|e| {
        error!("Failed to get timer snapshot: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let total_paused_millis = state.get_total_paused_millis().map_err(|e| {
        error!("Failed to get paused time: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        total_paused_millis,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /state - Return the persisted form of the timer state
pub async fn state_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerState>, StatusCode> {
    state.get_persisted_state().map(Json).map_err(|e| {
        error!("Failed to get persisted state: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// 422 response carrying the unchanged timer
fn rejected(state: &AppState, message: String) -> (StatusCode, Json<ApiResponse>) {
    match state.get_snapshot() {
        Ok(snapshot) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::rejected(message, snapshot)),
        ),
        Err(e) => internal_error(e),
    }
}

fn internal_error(e: DispatchError) -> (StatusCode, Json<ApiResponse>) {
    error!("Failed to set interval: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::new("error".to_string(), e.to_string(), Default::default())),
    )
}
