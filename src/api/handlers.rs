//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{info, warn};

use crate::state::{AppState, Step, TimerState, Transport};
use super::responses::{ApiResponse, DurationRequest, HealthResponse, StatusResponse};

fn press(state: &AppState, button: Transport, message: &str) -> Json<ApiResponse> {
    let timer = state.transport(button);
    info!("{} endpoint called - {}", button.as_str(), timer.display());
    Json(ApiResponse::from_timer(message.to_string(), timer))
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    press(&state, Transport::Start, "Countdown started")
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    press(&state, Transport::Pause, "Countdown paused")
}

/// Handle POST /stop - Stop and reset to zero
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    press(&state, Transport::Stop, "Countdown stopped")
}

/// Handle POST /skip - Skip to zero
pub async fn skip_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    press(&state, Transport::Skip, "Countdown skipped to zero")
}

/// Handle PUT /duration - Set the configured duration
pub async fn set_duration_handler(
    State(state): State<Arc<AppState>>,
    request: Result<Json<DurationRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)> {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            warn!("Malformed duration request: {}", rejection.body_text());
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(rejection.body_text(), state.timer())),
            ));
        }
    };

    match state.set_duration(request.seconds) {
        Ok(timer) => Ok(Json(ApiResponse::from_timer(
            format!("Duration set to {}s", timer.configured_duration),
            timer,
        ))),
        Err(e) => {
            warn!("Rejected duration: {}", e);
            Err((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(e.to_string(), state.timer())),
            ))
        }
    }
}

/// Handle POST /duration/increment - Stepper up
pub async fn increment_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.step_duration(Step::Up);
    Json(ApiResponse::from_timer(
        format!("Duration set to {}s", timer.configured_duration),
        timer,
    ))
}

/// Handle POST /duration/decrement - Stepper down
pub async fn decrement_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.step_duration(Step::Down);
    Json(ApiResponse::from_timer(
        format!("Duration set to {}s", timer.configured_duration),
        timer,
    ))
}

/// Handle GET /status - Return the time display and server metadata
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.timer(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /events - Stream every timer change as server-sent events
///
/// The current state is sent immediately, then one `timer` event per change.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let updates = state.subscribe();

    let events = stream::unfold((updates, true), |(mut updates, first)| async move {
        if !first {
            updates.changed().await.ok()?;
        }
        let timer = updates.borrow_and_update().clone();
        Some((Ok(timer_event(&timer)), (updates, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn timer_event(timer: &TimerState) -> Event {
    Event::default()
        .event("timer")
        .json_data(timer)
        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
