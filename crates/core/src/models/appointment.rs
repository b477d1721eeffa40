use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::{ClinicError, ClinicResult};
use crate::window::{self, AppointmentWindow, WindowState};

/// Where an appointment stands.
///
/// Stored values that are not recognized are kept verbatim in `Unknown` and
/// never count as confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    /// Confirmed and inside its window right now. Computed, never stored.
    Ongoing,
    Rejected,
    Unknown(String),
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Ongoing => "ongoing",
            AppointmentStatus::Rejected => "rejected",
            AppointmentStatus::Unknown(raw) => raw,
        }
    }

    /// Whether chat and video may open for this status.
    pub fn is_active(&self) -> bool {
        matches!(self, AppointmentStatus::Confirmed | AppointmentStatus::Ongoing)
    }

    /// Whether the appointment still holds its slot.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Rejected)
    }

    /// Statuses a doctor may move an appointment to from this one.
    pub fn valid_transitions(&self) -> Vec<AppointmentStatus> {
        match self {
            AppointmentStatus::Pending => vec![AppointmentStatus::Confirmed, AppointmentStatus::Rejected],
            _ => Vec::new(),
        }
    }

    /// Applies a doctor's decision.
    ///
    /// # Errors
    ///
    /// * `ClinicError::InvalidTransition` - `target` is not reachable from
    ///   the current status
    pub fn transition_to(&self, target: &AppointmentStatus) -> ClinicResult<AppointmentStatus> {
        if !self.valid_transitions().contains(target) {
            warn!("Invalid status transition attempted: {} -> {}", self, target);
            return Err(ClinicError::InvalidTransition(format!(
                "cannot move appointment from {self} to {target}"
            )));
        }
        Ok(target.clone())
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for AppointmentStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => AppointmentStatus::Pending,
            "confirmed" => AppointmentStatus::Confirmed,
            "ongoing" => AppointmentStatus::Ongoing,
            "rejected" => AppointmentStatus::Rejected,
            _ => AppointmentStatus::Unknown(value),
        }
    }
}

impl From<&str> for AppointmentStatus {
    fn from(value: &str) -> Self {
        AppointmentStatus::from(value.to_string())
    }
}

impl From<AppointmentStatus> for String {
    fn from(value: AppointmentStatus) -> Self {
        value.as_str().to_string()
    }
}

/// A booked consultation between a patient and a doctor.
///
/// Date and times are kept as the strings the store holds; they are parsed
/// each time a window is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub start_time: String,
    pub end_time: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn window(&self) -> AppointmentWindow {
        AppointmentWindow {
            date: self.date.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            status: self.status.clone(),
        }
    }

    pub fn window_state(&self, now: NaiveDateTime, default_duration_minutes: u16) -> WindowState {
        window::evaluate_window(now, &self.window(), default_duration_minutes)
    }

    /// Status to show at `now`: a confirmed appointment inside its window
    /// reads as ongoing.
    pub fn effective_status(&self, now: NaiveDateTime, default_duration_minutes: u16) -> AppointmentStatus {
        if self.window_state(now, default_duration_minutes).is_open() {
            AppointmentStatus::Ongoing
        } else {
            self.status.clone()
        }
    }
}
