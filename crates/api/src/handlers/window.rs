//! # Window Handlers
//!
//! Whether the chat and video affordances of an appointment may be shown.
//! A closed window is an ordinary answer, not an error: the response says
//! why it is closed.

use axum::{
    Json,
    extract::{Path, State},
};
use careslot_core::{
    errors::ClinicError,
    models::appointment::AppointmentStatus,
    window::{AppointmentWindow, WindowState, evaluate_window, format_remaining},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowCheckRequest {
    #[serde(flatten)]
    pub window: AppointmentWindow,
    /// Clinic wall-clock time to evaluate at; defaults to the current time
    #[serde(default)]
    pub now: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowResponse {
    pub open: bool,
    pub state: String,
    pub message: String,
    pub remaining_seconds: Option<i64>,
    pub time_remaining: Option<String>,
    pub effective_status: AppointmentStatus,
}

impl WindowResponse {
    fn new(state: &WindowState, stored: &AppointmentStatus) -> Self {
        let effective_status = if state.is_open() {
            AppointmentStatus::Ongoing
        } else {
            stored.clone()
        };

        Self {
            open: state.is_open(),
            state: state.kind().to_string(),
            message: state.message().to_string(),
            remaining_seconds: state.remaining().map(|remaining| remaining.num_seconds()),
            time_remaining: state.remaining().map(format_remaining),
            effective_status,
        }
    }
}

#[axum::debug_handler]
pub async fn appointment_window(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WindowResponse>, AppError> {
    let appointment = state
        .appointments
        .find_appointment(id)
        .await?
        .ok_or_else(|| ClinicError::NotFound(format!("Appointment with ID {} not found", id)))?;

    let window_state = appointment.window_state(state.local_now(), state.policy.default_duration_minutes);

    Ok(Json(WindowResponse::new(&window_state, &appointment.status)))
}

/// Evaluates a window the caller supplies, without touching the store
///
/// ```text
/// POST /api/window/check
/// {"date": "2024-03-04", "startTime": "10:00", "status": "confirmed", "now": "2024-03-04T10:05:00"}
/// ```
#[axum::debug_handler]
pub async fn check_window(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<WindowCheckRequest>,
) -> Json<WindowResponse> {
    let now = payload.now.unwrap_or_else(|| state.local_now());
    let window_state = evaluate_window(now, &payload.window, state.policy.default_duration_minutes);

    Json(WindowResponse::new(&window_state, &payload.window.status))
}
