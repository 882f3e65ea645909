//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{engine::TimerSnapshot, state::TimerPhase};

/// API response structure for intent endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Response whose status mirrors the timer phase
    pub fn phase(message: String, timer: TimerSnapshot) -> Self {
        let status = match timer.phase {
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Stopped => "stopped",
        };
        Self::new(status.to_string(), message, timer)
    }

    /// Create a rejected-input response
    pub fn rejected(message: String, timer: TimerSnapshot) -> Self {
        Self::new("rejected".to_string(), message, timer)
    }
}

/// Body of `PUT /interval`: either a number (or null to disable) or raw text
/// from a text-entry control. Any other shape fails to deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntervalRequest {
    Text(TextInterval),
    Seconds(SecondsInterval),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextInterval {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecondsInterval {
    /// Required key; an explicit `null` disables the interval
    #[serde(deserialize_with = "Option::deserialize")]
    pub seconds: Option<i64>,
}

/// Status response with timer and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub total_paused_millis: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
