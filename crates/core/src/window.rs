//! # Appointment Window
//!
//! Decides whether the chat and video affordances of an appointment are
//! open at a given instant. Evaluation is cheap and side-effect free, so UI
//! code may re-run it on every tick.
//!
//! Anything that cannot be parsed closes the window: granting a call that
//! was never scheduled is worse than refusing a valid one.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::{self, ClockTime};
use crate::errors::{ClinicError, ClinicResult};
use crate::models::appointment::AppointmentStatus;
use crate::policy::DEFAULT_APPOINTMENT_MINUTES;

/// The fields of an appointment the window depends on, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentWindow {
    pub date: String,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowState {
    Open {
        ends_at: NaiveDateTime,
        remaining: Duration,
    },
    TooEarly {
        starts_at: NaiveDateTime,
    },
    Ended {
        ended_at: NaiveDateTime,
    },
    NotConfirmed {
        status: AppointmentStatus,
    },
    Malformed {
        reason: String,
    },
}

impl WindowState {
    pub fn is_open(&self) -> bool {
        matches!(self, WindowState::Open { .. })
    }

    /// Stable machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            WindowState::Open { .. } => "open",
            WindowState::TooEarly { .. } => "too_early",
            WindowState::Ended { .. } => "ended",
            WindowState::NotConfirmed { .. } => "not_confirmed",
            WindowState::Malformed { .. } => "malformed",
        }
    }

    /// Message to show the user.
    pub fn message(&self) -> &'static str {
        match self {
            WindowState::Open { .. } => "Video call is available.",
            WindowState::TooEarly { .. } => {
                "Video call is not available yet. It opens at the appointment time."
            }
            WindowState::Ended { .. } => "Appointment time has ended.",
            WindowState::NotConfirmed { .. } => "Appointment has not been confirmed by the doctor.",
            WindowState::Malformed { .. } => "Appointment time could not be read.",
        }
    }

    pub fn remaining(&self) -> Option<Duration> {
        match self {
            WindowState::Open { remaining, .. } => Some(*remaining),
            _ => None,
        }
    }
}

/// Absolute start and end of an appointment.
///
/// Without an end time the appointment lasts `default_duration_minutes`.
///
/// # Errors
///
/// * `ClinicError::MalformedTimestamp` - the date or a time does not parse,
///   or the end lies before the start
pub fn resolve_interval(
    date: &str,
    start_time: &str,
    end_time: Option<&str>,
    default_duration_minutes: u16,
) -> ClinicResult<(NaiveDateTime, NaiveDateTime)> {
    let date = clock::parse_date(date)?;
    let starts_at = start_time.parse::<ClockTime>()?.on(date);
    let ends_at = match end_time {
        Some(end_time) => end_time.parse::<ClockTime>()?.on(date),
        None => starts_at + Duration::minutes(i64::from(default_duration_minutes)),
    };

    if ends_at < starts_at {
        return Err(ClinicError::MalformedTimestamp(format!(
            "appointment on {date} ends at {} before it starts at {}",
            ends_at.time(),
            starts_at.time()
        )));
    }
    Ok((starts_at, ends_at))
}

/// Where `now` falls relative to the appointment window.
///
/// Bounds are inclusive on both ends. A window that cannot be resolved is
/// reported as `Malformed` before the status is looked at.
pub fn evaluate_window(now: NaiveDateTime, window: &AppointmentWindow, default_duration_minutes: u16) -> WindowState {
    let (starts_at, ends_at) = match resolve_interval(
        &window.date,
        &window.start_time,
        window.end_time.as_deref(),
        default_duration_minutes,
    ) {
        Ok(interval) => interval,
        Err(e) => {
            warn!(date = %window.date, start_time = %window.start_time, "Closing appointment window: {}", e);
            return WindowState::Malformed { reason: e.to_string() };
        }
    };

    if !window.status.is_active() {
        return WindowState::NotConfirmed {
            status: window.status.clone(),
        };
    }
    if now < starts_at {
        return WindowState::TooEarly { starts_at };
    }
    if now > ends_at {
        return WindowState::Ended { ended_at: ends_at };
    }
    WindowState::Open {
        ends_at,
        remaining: ends_at - now,
    }
}

/// `true` iff the appointment is confirmed and `start <= now <= end`.
pub fn is_within_window(
    now: NaiveDateTime,
    date: &str,
    start_time: &str,
    end_time: Option<&str>,
    status: &str,
) -> bool {
    let window = AppointmentWindow {
        date: date.to_string(),
        start_time: start_time.to_string(),
        end_time: end_time.map(str::to_string),
        status: AppointmentStatus::from(status),
    };
    evaluate_window(now, &window, DEFAULT_APPOINTMENT_MINUTES).is_open()
}

/// Countdown text such as `"12m 5s"`.
pub fn format_remaining(remaining: Duration) -> String {
    let seconds = remaining.num_seconds().max(0);
    format!("{}m {}s", seconds / 60, seconds % 60)
}
