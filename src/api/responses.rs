//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::TimerState;

/// Response for every command endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
}

impl ApiResponse {
    pub fn new(status: &str, message: String, timer: TimerState) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Status derived from the timer: `running`, `paused` or `idle`
    pub fn from_timer(message: String, timer: TimerState) -> Self {
        let status = if timer.running {
            "running"
        } else if timer.is_paused() {
            "paused"
        } else {
            "idle"
        };
        Self::new(status, message, timer)
    }

    pub fn error(message: String, timer: TimerState) -> Self {
        Self::new("error", message, timer)
    }
}

/// Body of `PUT /duration`
#[derive(Debug, Clone, Deserialize)]
pub struct DurationRequest {
    pub seconds: u32,
}

/// Full status with server metadata
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub timer: TimerState,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
